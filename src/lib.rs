// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # dotresolve
//!
//! A lightweight, thread-safe service locator and invocation shim toolkit.
//! `dotresolve` provides registration and resolution of abstractions -
//! singletons and per-call factories backed by constructors, methods,
//! property getters, or plain closures - with call-time argument coercion
//! and exception-transparent invocation.
//!
//! ## Features
//!
//! - **🧭 Service locator** - Register abstractions once, resolve them anywhere;
//!   singleton and per-call strategies live in independent namespaces
//! - **🔌 Invocation shims** - Every member invokes through one uniform
//!   `(instance, args)` signature, with per-(member, context) caching
//! - **🛡️ Exception transparency** - A failing target's original error value
//!   reaches the caller unchanged; no generic "invocation failed" wrapper
//! - **🔄 Argument coercion** - Call-time values convert to declared parameter
//!   types: numeric family conversions and string parsing, rejected cleanly
//!   otherwise
//! - **⚡ Concurrent by design** - Lock-free registration tables and shim
//!   caches; lazy singletons materialize exactly once on the success path
//!
//! ## Quick Start
//!
//! Add `dotresolve` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dotresolve = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use dotresolve::prelude::*;
//!
//! struct Settings {
//!     verbose: bool,
//! }
//!
//! let resolver = Resolver::new();
//! resolver.register_singleton(Settings { verbose: true });
//!
//! let settings = resolver.get_singleton::<Settings>()?;
//! assert!(settings.verbose);
//! # Ok::<(), dotresolve::Error>(())
//! ```
//!
//! ### Per-Call Factories with Coercion
//!
//! ```rust
//! use dotresolve::{ParamType, Resolver, Value};
//!
//! struct Connection {
//!     port: u16,
//! }
//!
//! let resolver = Resolver::new();
//! resolver.register_factory(vec![ParamType::U2], |args: &[Value]| {
//!     Ok(Connection {
//!         port: args[0].as_i32().unwrap_or(0) as u16,
//!     })
//! });
//!
//! // The string argument coerces to the declared U2 parameter.
//! let conn = resolver.get::<Connection>(&[Value::from("8080")])?;
//! assert_eq!(conn.port, 8080);
//! # Ok::<(), dotresolve::Error>(())
//! ```
//!
//! ### The Process-Wide Instance
//!
//! Library code can resolve dependencies through a well-known access point
//! without threading a resolver reference everywhere. This is an explicit,
//! documented global with explicit mutation:
//!
//! ```rust
//! use dotresolve::Resolver;
//! use std::sync::Arc;
//!
//! let custom = Arc::new(Resolver::new());
//! Resolver::set_instance(custom.clone());
//! assert!(Arc::ptr_eq(&Resolver::instance(), &custom));
//!
//! Resolver::reset_to_default();
//! ```

#[macro_use]
mod macros;

pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the dotresolve library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use dotresolve::prelude::*;
///
/// let resolver = Resolver::new();
/// resolver.register_singleton(42u32);
/// assert_eq!(*resolver.get_singleton::<u32>()?, 42);
/// # Ok::<(), dotresolve::Error>(())
/// ```
pub mod prelude;

/// Service locator: strategy registration and abstraction resolution.
///
/// The public entry point of the crate. Key types:
///
/// - [`Resolver`] - Registration tables, shim cache, and the resolution API
/// - [`locator::AbstractionKey`] - Type identity used to request a resolution
/// - [`Injectable`] - Registration-time constructor table for a type
pub mod locator;

/// Invocation shims: uniform, exception-transparent member invocation.
///
/// Members register as [`MemberDescriptor`]s - invocation shape, access
/// flags, declared parameters, and a type-erased entry point - and compile
/// through the [`ShimBuilder`] into cached uniform callables. A target's
/// error value always reaches the caller unchanged.
pub mod shim;

/// Runtime value model and argument coercion.
///
/// - [`Value`] / [`ValueKind`] - Runtime carrier for arguments and results
/// - [`value::coerce`] - Declared parameter types and the coercion engine
pub mod value;

/// Small self-contained helpers kept alongside the resolution core.
///
/// Keyed read-only collection views, progress-reporting stream copy, and
/// string slicing helpers.
pub mod utils;

/// `dotresolve` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use dotresolve::{Resolver, Result};
/// use std::sync::Arc;
///
/// fn resolve_settings(resolver: &Resolver) -> Result<Arc<String>> {
///     resolver.get_singleton::<String>()
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dotresolve` Error type
///
/// The main error type for all operations in this crate. Provides detailed
/// error information for registration, shim construction, argument coercion,
/// and resolution, and carries target failures through unchanged.
pub use error::Error;

/// Type-erased error produced by a registered target.
pub use error::TargetError;

/// Registration and resolution of abstractions.
///
/// See [`locator::Resolver`] for the full registration model.
pub use locator::{Injectable, Resolver};

/// Member description and shim construction types.
pub use shim::{HostContext, MemberDescriptor, MemberFlags, MemberKind, Shim, ShimBuilder};

/// Runtime value carrier and coercion types.
pub use value::coerce::{coerce, CoercionOutcome, ParamType};

/// Runtime value carrier enum and its discriminant.
pub use value::{Value, ValueKind};
