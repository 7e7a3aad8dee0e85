//! Service locator: strategy registration and abstraction resolution.
//!
//! The locator is the public entry point of the crate. Abstractions register
//! at startup - as fixed or lazy singletons, or as per-call factories backed
//! by closures, member shims, or [`Injectable`] constructor tables - and
//! resolve at call time through [`Resolver::get`] / [`Resolver::get_singleton`].
//!
//! # Key Types
//!
//! - [`Resolver`] - Registration tables, shim cache, and the resolution API
//! - [`AbstractionKey`] - Type identity used to request a resolution
//! - [`Injectable`] - Registration-time constructor table for a type
//!
//! # Registration Semantics
//!
//! - First registration wins: a second registration for the same key in the
//!   same namespace returns `false` and changes nothing.
//! - Singletons and per-call factories are independent namespaces; an
//!   abstraction may carry both simultaneously, and callers use the matching
//!   accessor.
//! - Lazy singletons materialize exactly once on the success path; a factory
//!   failure leaves the registration pending for a retry.

mod key;
pub(crate) mod registry;
pub(crate) mod singleton;
mod resolver;

pub use key::AbstractionKey;
pub use resolver::{Injectable, Resolver};
