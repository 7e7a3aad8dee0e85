//! # dotresolve Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! and traits from the dotresolve library. Import this module to get quick
//! access to the essential types for service registration and resolution.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotresolve operations
pub use crate::Error;

/// The result type used throughout dotresolve
pub use crate::Result;

/// Type-erased error produced by a registered target
pub use crate::TargetError;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The service locator
pub use crate::locator::{AbstractionKey, Injectable, Resolver};

// ================================================================================================
// Shim Layer
// ================================================================================================

/// Member description and shim construction
pub use crate::shim::{
    HostContext, MemberDescriptor, MemberFlags, MemberKind, Shim, ShimBuilder,
    MAX_INSTANCE_PARAMS, MAX_STATIC_PARAMS,
};

// ================================================================================================
// Values and Coercion
// ================================================================================================

/// Runtime value carrier and coercion
pub use crate::value::coerce::{coerce, coerce_all, CoercionOutcome, ParamType};
pub use crate::value::{Value, ValueKind};
