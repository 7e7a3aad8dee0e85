//! Invocation shims: uniform, exception-transparent member invocation.
//!
//! The shim layer gives every registered member - constructor, static or
//! instance method, property getter - the same calling convention:
//! `(instance, args) -> Result<Value>`. Members are described up front as
//! [`MemberDescriptor`]s in a closure registry; the [`ShimBuilder`] validates
//! each descriptor once and compiles it into a cached callable, so invocation
//! never goes through a wrapping dispatch layer that could obscure a target's
//! own failure.
//!
//! # Key Types
//!
//! - [`MemberDescriptor`] - Host-supplied description of an invocable member
//! - [`MemberKind`] / [`MemberFlags`] - Invocation shape and access flags
//! - [`HostContext`] - Requesting scope, checked against non-public members
//! - [`Shim`] - The compiled uniform callable
//! - [`ShimBuilder`] - Validation plus per-(member, context) caching
//!
//! # Examples
//!
//! ```rust
//! use dotresolve::{HostContext, MemberDescriptor, ParamType, ShimBuilder, Value};
//!
//! let descriptor = MemberDescriptor::static_function(
//!     "Math::square",
//!     "Math",
//!     vec![ParamType::I4],
//!     ParamType::I4,
//!     |_, args| {
//!         let n = args[0].as_i32().unwrap_or(0);
//!         Ok(Value::I4(n * n))
//!     },
//! );
//!
//! let shim = ShimBuilder::global().build(&descriptor, &HostContext::public())?;
//! let result = shim.invoke(None, &[Value::I4(9)])?;
//! assert_eq!(result.as_i32(), Some(81));
//! # Ok::<(), dotresolve::Error>(())
//! ```

mod builder;
mod descriptor;

pub use builder::{Shim, ShimBuilder, MAX_INSTANCE_PARAMS, MAX_STATIC_PARAMS};
pub use descriptor::{HostContext, MemberBody, MemberDescriptor, MemberFlags, MemberKind};
