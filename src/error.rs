use thiserror::Error;

/// Type-erased error produced by a registered target (factory body, constructor,
/// property getter, or method).
///
/// Targets surface their failures as ordinary boxed errors. The library never
/// inspects or rewrites these values; they travel through [`Error::Target`]
/// unchanged so callers can downcast back to the original error type.
pub type TargetError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure modes of shim building, argument coercion, and
/// service resolution. Each variant provides specific context about the failure
/// mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## Resolution Errors
/// - [`Error::NotRegistered`] - No strategy registered for the requested abstraction
/// - [`Error::TypeMismatch`] - Produced value could not be converted to the requested type
///
/// ## Shim Construction Errors
/// - [`Error::TooManyParameters`] - Member exceeds the supported parameter count
/// - [`Error::UnsupportedMemberShape`] - Member kind cannot be shimmed
/// - [`Error::MemberNotAccessible`] - Host context does not grant access to the member
/// - [`Error::ReceiverMismatch`] - Instance supplied to a static member or vice versa
///
/// ## Registration Errors
/// - [`Error::AmbiguousConstructor`] - Zero or multiple public constructors for auto-registration
///
/// ## Argument Errors
/// - [`Error::ArgumentCount`] - Supplied argument count does not match the declared parameter list
/// - [`Error::ArgumentCoercion`] - A supplied argument could not be coerced to its declared type
///
/// ## Passthrough
/// - [`Error::Target`] - A registered target failed; carries the original error unchanged
///
/// Note that a duplicate registration is *not* an error: registration methods
/// signal it through a `false` return value.
///
/// # Examples
///
/// ```rust
/// use dotresolve::{Error, Resolver, Value};
///
/// let resolver = Resolver::new();
/// match resolver.get::<String>(&[]) {
///     Ok(value) => println!("Resolved: {}", value),
///     Err(Error::NotRegistered { type_name, .. }) => {
///         eprintln!("Nothing registered for {}", type_name);
///     }
///     Err(Error::Target(source)) => {
///         eprintln!("Factory failed: {}", source);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// No strategy is registered for the requested abstraction.
    ///
    /// Singleton and per-call factory registrations live in distinct
    /// namespaces keyed by the same abstraction type; this error reports
    /// which namespace was consulted so a miss in one is not confused with
    /// a miss in the other.
    #[error("No {namespace} registration for type '{type_name}'")]
    NotRegistered {
        /// Name of the abstraction type that was requested
        type_name: &'static str,
        /// The strategy namespace that was consulted (`"singleton"` or `"factory"`)
        namespace: &'static str,
    },

    /// A member declares more parameters than the shim layer supports.
    ///
    /// Static members and constructors support up to 16 declared parameters;
    /// instance members support 15, as the receiver occupies a slot. Requests
    /// beyond the limit fail fast instead of attempting a degraded call path.
    #[error("Member declares {count} parameters, supported maximum is {max}")]
    TooManyParameters {
        /// Number of parameters the member declares
        count: usize,
        /// Supported maximum for the member's shape
        max: usize,
    },

    /// The member kind is categorically unsupported by the shim builder.
    ///
    /// Type initializers and abstract members cannot be invoked through a
    /// shim; building one fails fast with this error rather than attempting
    /// generation.
    #[error("Unsupported member shape - {0}")]
    UnsupportedMemberShape(String),

    /// The host context does not grant access to a non-public member.
    #[error("Member '{member}' is not accessible from context '{context}'")]
    MemberNotAccessible {
        /// Identifier of the member that was requested
        member: String,
        /// Identifier of the requesting host context
        context: String,
    },

    /// An instance was supplied to a static member, or omitted for an instance member.
    #[error("Member '{member}' expects {expected}")]
    ReceiverMismatch {
        /// Identifier of the member that was invoked
        member: String,
        /// Description of the expected receiver shape
        expected: &'static str,
    },

    /// Automatic constructor registration found zero or multiple public constructors.
    ///
    /// [`crate::Resolver::register_constructor`] requires exactly one public
    /// constructor on the implementation type. This is a configuration error
    /// surfaced at registration time, never at call time.
    #[error("Type '{type_name}' has {found} public constructors, expected exactly 1")]
    AmbiguousConstructor {
        /// Name of the implementation type
        type_name: &'static str,
        /// Number of public constructors that were found
        found: usize,
    },

    /// The number of supplied call-time arguments does not match the declared parameter list.
    #[error("Expected {expected} arguments, {supplied} were supplied")]
    ArgumentCount {
        /// Number of parameters the target declares
        expected: usize,
        /// Number of arguments that were supplied
        supplied: usize,
    },

    /// A supplied call-time argument could not be coerced to its declared parameter type.
    ///
    /// The position identifies the offending argument (zero-based); the reason
    /// carries the underlying parse or conversion failure.
    #[error("Argument {position} could not be coerced - {reason}")]
    ArgumentCoercion {
        /// Zero-based position of the offending argument
        position: usize,
        /// Why the coercion was rejected
        reason: String,
    },

    /// A produced value could not be converted to the requested type.
    ///
    /// Raised on typed extraction when the value a strategy produced does not
    /// hold the requested type, or when an instance is still shared and cannot
    /// be handed out by value.
    #[error("Expected a value of type '{expected}', found {actual}")]
    TypeMismatch {
        /// Name of the requested type
        expected: &'static str,
        /// Description of the value that was actually produced
        actual: String,
    },

    /// Invalid configuration supplied to a utility constructor.
    ///
    /// Used for caller errors outside the resolution core, such as duplicate
    /// keys when building a keyed view or a zero-sized copy chunk.
    #[error("{0}")]
    Configuration(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors raised by the stream copy utilities.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically
    /// when trying to acquire a mutex or rwlock that is in an invalid state.
    #[error("Failed to lock target")]
    LockError,

    /// A registered target failed; the original error passes through unchanged.
    ///
    /// This is the central invariant of the shim layer: when a factory body,
    /// constructor, property getter, or method fails, its error value is
    /// carried here with identity and message intact. The library never
    /// substitutes a generic "invocation failed" error for it. Use
    /// [`Error::target_ref`] to recover the concrete error type.
    #[error(transparent)]
    Target(TargetError),
}

impl Error {
    /// Returns `true` if this error originated in a registered target rather
    /// than in the resolution machinery itself.
    #[must_use]
    pub fn is_target(&self) -> bool {
        matches!(self, Error::Target(_))
    }

    /// Attempts to view the original target error as a concrete type.
    ///
    /// Returns `None` if this error did not originate in a target, or if the
    /// target error is of a different type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dotresolve::Error;
    /// use std::fmt;
    ///
    /// #[derive(Debug)]
    /// struct BrokenWidget;
    ///
    /// impl fmt::Display for BrokenWidget {
    ///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    ///         write!(f, "widget is broken")
    ///     }
    /// }
    ///
    /// impl std::error::Error for BrokenWidget {}
    ///
    /// let err = Error::Target(Box::new(BrokenWidget));
    /// assert!(err.target_ref::<BrokenWidget>().is_some());
    /// ```
    #[must_use]
    pub fn target_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Error::Target(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
