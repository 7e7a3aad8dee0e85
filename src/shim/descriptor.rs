//! Member descriptors: host-supplied descriptions of invocable members.
//!
//! There is no runtime member discovery; the host application describes each
//! member up front: its invocation shape, access flags, declared parameter
//! list, and a type-erased entry point. The [`crate::shim::ShimBuilder`]
//! validates the descriptor and compiles it into a cached uniform callable.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use strum::{Display, EnumIter};

use crate::{ParamType, TargetError, Value};

/// Invocation shape of a member.
///
/// Static and instance members split into procedures (no return value) and
/// functions (with a return value); constructors are a fifth shape returning
/// the constructed value, and property getters invoke as zero-argument
/// instance functions. Type initializers are categorically unsupported and
/// exist only so that building one fails with a descriptive error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// Static member with no return value
    StaticProcedure,
    /// Static member with a return value
    StaticFunction,
    /// Instance member with no return value
    InstanceProcedure,
    /// Instance member with a return value
    InstanceFunction,
    /// Constructor; returns the constructed value
    Constructor,
    /// Property getter; a zero-argument instance function
    PropertyGetter,
    /// Type initializer; cannot be shimmed
    TypeInitializer,
}

impl MemberKind {
    /// Returns `true` for shapes invoked on an instance receiver.
    #[must_use]
    pub fn requires_instance(self) -> bool {
        matches!(
            self,
            MemberKind::InstanceProcedure | MemberKind::InstanceFunction | MemberKind::PropertyGetter
        )
    }

    /// Returns `true` for shapes that produce a value.
    #[must_use]
    pub fn has_return(self) -> bool {
        matches!(
            self,
            MemberKind::StaticFunction
                | MemberKind::InstanceFunction
                | MemberKind::Constructor
                | MemberKind::PropertyGetter
        )
    }
}

bitflags! {
    /// Access and shape flags of a member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MemberFlags: u8 {
        /// Member is publicly accessible
        const PUBLIC = 0x01;
        /// Member is static (no instance receiver)
        const STATIC = 0x02;
        /// Member is abstract and has no body
        const ABSTRACT = 0x04;
    }
}

/// Type-erased entry point of a member.
///
/// Receives the optional instance receiver and the (already coerced)
/// argument slice. Failures travel out as boxed [`TargetError`]s and are
/// surfaced to resolution callers unchanged.
pub type MemberBody =
    Arc<dyn Fn(Option<&Value>, &[Value]) -> std::result::Result<Value, TargetError> + Send + Sync>;

/// Complete description of an invocable member.
///
/// Built through the shape-specific constructors ([`MemberDescriptor::constructor`],
/// [`MemberDescriptor::static_function`], ...), which set the matching
/// [`MemberKind`] and default flags. All members default to `PUBLIC`; use
/// [`MemberDescriptor::with_flags`] to declare non-public or abstract members.
///
/// # Examples
///
/// ```rust
/// use dotresolve::{MemberDescriptor, ParamType, Value};
///
/// let descriptor = MemberDescriptor::static_function(
///     "Math::double",
///     "Math",
///     vec![ParamType::I4],
///     ParamType::I4,
///     |_, args| Ok(Value::I4(args[0].as_i32().unwrap_or(0) * 2)),
/// );
/// assert_eq!(descriptor.id(), "Math::double");
/// ```
#[derive(Clone)]
pub struct MemberDescriptor {
    id: String,
    declaring_scope: String,
    kind: MemberKind,
    flags: MemberFlags,
    params: Arc<[ParamType]>,
    returns: Option<ParamType>,
    body: MemberBody,
}

impl MemberDescriptor {
    fn new(
        id: impl Into<String>,
        declaring_scope: impl Into<String>,
        kind: MemberKind,
        flags: MemberFlags,
        params: Vec<ParamType>,
        returns: Option<ParamType>,
        body: MemberBody,
    ) -> Self {
        MemberDescriptor {
            id: id.into(),
            declaring_scope: declaring_scope.into(),
            kind,
            flags,
            params: params.into(),
            returns,
            body,
        }
    }

    /// Describes a constructor. Returns the constructed value.
    pub fn constructor<F>(
        id: impl Into<String>,
        declaring_scope: impl Into<String>,
        params: Vec<ParamType>,
        returns: ParamType,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> std::result::Result<Value, TargetError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(
            id,
            declaring_scope,
            MemberKind::Constructor,
            MemberFlags::PUBLIC | MemberFlags::STATIC,
            params,
            Some(returns),
            Arc::new(body),
        )
    }

    /// Describes a static function (has a return value).
    pub fn static_function<F>(
        id: impl Into<String>,
        declaring_scope: impl Into<String>,
        params: Vec<ParamType>,
        returns: ParamType,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> std::result::Result<Value, TargetError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(
            id,
            declaring_scope,
            MemberKind::StaticFunction,
            MemberFlags::PUBLIC | MemberFlags::STATIC,
            params,
            Some(returns),
            Arc::new(body),
        )
    }

    /// Describes a static procedure (no return value).
    pub fn static_procedure<F>(
        id: impl Into<String>,
        declaring_scope: impl Into<String>,
        params: Vec<ParamType>,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> std::result::Result<Value, TargetError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(
            id,
            declaring_scope,
            MemberKind::StaticProcedure,
            MemberFlags::PUBLIC | MemberFlags::STATIC,
            params,
            None,
            Arc::new(body),
        )
    }

    /// Describes an instance function (has a return value).
    pub fn instance_function<F>(
        id: impl Into<String>,
        declaring_scope: impl Into<String>,
        params: Vec<ParamType>,
        returns: ParamType,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> std::result::Result<Value, TargetError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(
            id,
            declaring_scope,
            MemberKind::InstanceFunction,
            MemberFlags::PUBLIC,
            params,
            Some(returns),
            Arc::new(body),
        )
    }

    /// Describes an instance procedure (no return value).
    pub fn instance_procedure<F>(
        id: impl Into<String>,
        declaring_scope: impl Into<String>,
        params: Vec<ParamType>,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> std::result::Result<Value, TargetError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(
            id,
            declaring_scope,
            MemberKind::InstanceProcedure,
            MemberFlags::PUBLIC,
            params,
            None,
            Arc::new(body),
        )
    }

    /// Describes a property getter: a zero-argument instance function.
    pub fn property_getter<F>(
        id: impl Into<String>,
        declaring_scope: impl Into<String>,
        returns: ParamType,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> std::result::Result<Value, TargetError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(
            id,
            declaring_scope,
            MemberKind::PropertyGetter,
            MemberFlags::PUBLIC,
            Vec::new(),
            Some(returns),
            Arc::new(body),
        )
    }

    /// Describes a type initializer.
    ///
    /// Type initializers cannot be shimmed; this descriptor exists so that
    /// attempting to build one fails fast with a descriptive error.
    pub fn type_initializer(id: impl Into<String>, declaring_scope: impl Into<String>) -> Self {
        Self::new(
            id,
            declaring_scope,
            MemberKind::TypeInitializer,
            MemberFlags::STATIC,
            Vec::new(),
            None,
            Arc::new(|_, _| Ok(Value::Null)),
        )
    }

    /// Replaces the default flags of this descriptor.
    #[must_use]
    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Unique identifier of the member, e.g. `"Widget::new"`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the scope (type) that declares this member.
    #[must_use]
    pub fn declaring_scope(&self) -> &str {
        &self.declaring_scope
    }

    /// Invocation shape of the member.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Access and shape flags of the member.
    #[must_use]
    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    /// Declared parameter types of the member.
    #[must_use]
    pub fn params(&self) -> &Arc<[ParamType]> {
        &self.params
    }

    /// Declared return type, `None` for procedures.
    #[must_use]
    pub fn returns(&self) -> Option<&ParamType> {
        self.returns.as_ref()
    }

    pub(crate) fn body(&self) -> MemberBody {
        self.body.clone()
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("id", &self.id)
            .field("declaring_scope", &self.declaring_scope)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Identity of the scope requesting a shim.
///
/// Shims for non-public members are only handed out when the requesting
/// context grants the member's declaring scope. The anonymous public context
/// grants nothing and can only reach public members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    id: String,
    scopes: Vec<String>,
}

impl HostContext {
    /// The anonymous context; reaches public members only.
    #[must_use]
    pub fn public() -> Self {
        HostContext {
            id: "<public>".to_string(),
            scopes: Vec::new(),
        }
    }

    /// Creates a named context with no granted scopes.
    pub fn named(id: impl Into<String>) -> Self {
        HostContext {
            id: id.into(),
            scopes: Vec::new(),
        }
    }

    /// Grants access to the named declaring scope.
    #[must_use]
    pub fn grant(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Identifier of this context; part of the shim cache key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this context grants access to the given declaring scope.
    #[must_use]
    pub fn grants(&self, scope: &str) -> bool {
        self.scopes.iter().any(|granted| granted == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(MemberKind::InstanceFunction.requires_instance());
        assert!(MemberKind::PropertyGetter.requires_instance());
        assert!(!MemberKind::Constructor.requires_instance());
        assert!(MemberKind::Constructor.has_return());
        assert!(!MemberKind::StaticProcedure.has_return());
    }

    #[test]
    fn test_descriptor_defaults() {
        let ctor = MemberDescriptor::constructor(
            "Widget::new",
            "Widget",
            vec![ParamType::String],
            ParamType::of::<String>(),
            |_, _| Ok(Value::Null),
        );
        assert_eq!(ctor.kind(), MemberKind::Constructor);
        assert!(ctor.flags().contains(MemberFlags::PUBLIC));
        assert!(ctor.flags().contains(MemberFlags::STATIC));
        assert_eq!(ctor.params().len(), 1);

        let getter = MemberDescriptor::property_getter(
            "Widget::name",
            "Widget",
            ParamType::String,
            |_, _| Ok(Value::Null),
        );
        assert!(getter.params().is_empty());
        assert!(!getter.flags().contains(MemberFlags::STATIC));
    }

    #[test]
    fn test_host_context_grants() {
        let ctx = HostContext::named("tests").grant("Widget");
        assert!(ctx.grants("Widget"));
        assert!(!ctx.grants("Gadget"));
        assert!(!HostContext::public().grants("Widget"));
    }
}
