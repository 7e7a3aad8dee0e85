//! Shim construction and caching.
//!
//! A [`Shim`] is the compiled form of a [`MemberDescriptor`]: a uniform
//! callable taking `(instance, args)` and returning a [`Value`]. Building a
//! shim validates the descriptor once - shape support, parameter count,
//! visibility against the requesting [`HostContext`] - so invocation is a
//! thin dispatch over the member body.
//!
//! # Caching
//!
//! Built shims are cached per `(member id, context id)` pair; repeated
//! builds return the same `Arc` without re-validation. Caching is an
//! optimization, not a correctness requirement, but it keeps repeated
//! resolution inexpensive. Failed builds are never cached.
//!
//! # Exception Transparency
//!
//! When a member body fails, the shim surfaces the body's boxed error as
//! [`Error::Target`] - a transparent passthrough. No generic "invocation
//! failed" wrapper is ever introduced at this layer.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::shim::{HostContext, MemberBody, MemberDescriptor, MemberFlags, MemberKind};
use crate::{Error, ParamType, Result, Value};

/// Maximum declared parameters for static members and constructors.
pub const MAX_STATIC_PARAMS: usize = 16;

/// Maximum declared parameters for instance members; the receiver occupies
/// one slot.
pub const MAX_INSTANCE_PARAMS: usize = 15;

/// A compiled, cached callable bound to a specific member.
///
/// Invocation goes through [`Shim::invoke`] with the uniform
/// `(instance, args)` signature regardless of the member's shape. A shim is
/// immutable after construction and freely shareable across threads.
pub struct Shim {
    id: String,
    kind: MemberKind,
    params: Arc<[ParamType]>,
    returns: Option<ParamType>,
    body: MemberBody,
}

impl Shim {
    /// Identifier of the member this shim is bound to.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Invocation shape of the underlying member.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Declared parameter types, used for call-time argument coercion.
    #[must_use]
    pub fn params(&self) -> &Arc<[ParamType]> {
        &self.params
    }

    /// Declared return type, `None` for procedures.
    #[must_use]
    pub fn returns(&self) -> Option<&ParamType> {
        self.returns.as_ref()
    }

    /// Invokes the underlying member.
    ///
    /// Arguments are expected to already satisfy the declared parameter
    /// types (see [`crate::value::coerce::coerce_all`]); this method checks
    /// only arity and receiver shape.
    ///
    /// # Errors
    ///
    /// - [`Error::ReceiverMismatch`] when an instance is supplied to a static
    ///   shape or omitted for an instance shape.
    /// - [`Error::ArgumentCount`] on arity mismatch.
    /// - [`Error::Target`] carrying the member body's original error,
    ///   unchanged.
    pub fn invoke(&self, instance: Option<&Value>, args: &[Value]) -> Result<Value> {
        if self.kind.requires_instance() {
            if instance.is_none() {
                return Err(Error::ReceiverMismatch {
                    member: self.id.clone(),
                    expected: "an instance receiver",
                });
            }
        } else if instance.is_some() {
            return Err(Error::ReceiverMismatch {
                member: self.id.clone(),
                expected: "no instance receiver",
            });
        }

        if args.len() != self.params.len() {
            return Err(Error::ArgumentCount {
                expected: self.params.len(),
                supplied: args.len(),
            });
        }

        let produced = (self.body)(instance, args).map_err(Error::Target)?;
        if self.returns.is_none() {
            return Ok(Value::Null);
        }
        Ok(produced)
    }
}

impl std::fmt::Debug for Shim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shim")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Cache key: one shim per (member, requesting context) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShimKey {
    member: String,
    context: String,
}

/// Validates member descriptors and compiles them into cached [`Shim`]s.
///
/// Builders are independent caches; most users share the process-wide
/// [`ShimBuilder::global`] instance, while isolated builders are useful in
/// tests and for resolvers with their own cache lifetime.
#[derive(Debug, Default)]
pub struct ShimBuilder {
    cache: DashMap<ShimKey, Arc<Shim>>,
}

impl ShimBuilder {
    /// Creates a builder with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        ShimBuilder {
            cache: DashMap::new(),
        }
    }

    /// The process-wide shared builder.
    pub fn global() -> &'static ShimBuilder {
        static GLOBAL: OnceLock<ShimBuilder> = OnceLock::new();
        GLOBAL.get_or_init(ShimBuilder::new)
    }

    /// Number of cached shims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if no shims are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Builds (or retrieves from cache) the shim for a member descriptor.
    ///
    /// Validation happens before the cache is touched, so a rejected
    /// descriptor never occupies a cache slot.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMemberShape`] for type initializers and abstract
    ///   members.
    /// - [`Error::MemberNotAccessible`] for non-public members whose
    ///   declaring scope the context does not grant.
    /// - [`Error::TooManyParameters`] when the declared parameter count
    ///   exceeds the shape's supported maximum.
    pub fn build(&self, descriptor: &MemberDescriptor, context: &HostContext) -> Result<Arc<Shim>> {
        self.validate(descriptor, context)?;

        let key = ShimKey {
            member: descriptor.id().to_string(),
            context: context.id().to_string(),
        };

        let shim = self
            .cache
            .entry(key)
            .or_insert_with(|| {
                Arc::new(Shim {
                    id: descriptor.id().to_string(),
                    kind: descriptor.kind(),
                    params: descriptor.params().clone(),
                    returns: descriptor.returns().cloned(),
                    body: descriptor.body(),
                })
            })
            .clone();

        Ok(shim)
    }

    fn validate(&self, descriptor: &MemberDescriptor, context: &HostContext) -> Result<()> {
        if descriptor.kind() == MemberKind::TypeInitializer {
            return Err(Error::UnsupportedMemberShape(format!(
                "'{}' is a type initializer and cannot be invoked through a shim",
                descriptor.id()
            )));
        }

        if descriptor.flags().contains(MemberFlags::ABSTRACT) {
            return Err(Error::UnsupportedMemberShape(format!(
                "'{}' is abstract and has no invocable body",
                descriptor.id()
            )));
        }

        if !descriptor.flags().contains(MemberFlags::PUBLIC)
            && !context.grants(descriptor.declaring_scope())
        {
            return Err(Error::MemberNotAccessible {
                member: descriptor.id().to_string(),
                context: context.id().to_string(),
            });
        }

        let max = if descriptor.kind().requires_instance() {
            MAX_INSTANCE_PARAMS
        } else {
            MAX_STATIC_PARAMS
        };
        if descriptor.params().len() > max {
            return Err(Error::TooManyParameters {
                count: descriptor.params().len(),
                max,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double_descriptor() -> MemberDescriptor {
        MemberDescriptor::static_function(
            "Math::double",
            "Math",
            vec![ParamType::I4],
            ParamType::I4,
            |_, args| Ok(Value::I4(args[0].as_i32().unwrap_or(0) * 2)),
        )
    }

    #[test]
    fn test_build_and_invoke_static_function() {
        let builder = ShimBuilder::new();
        let shim = builder
            .build(&double_descriptor(), &HostContext::public())
            .unwrap();

        let result = shim.invoke(None, &[Value::I4(21)]).unwrap();
        assert!(matches!(result, Value::I4(42)));
    }

    #[test]
    fn test_cache_returns_same_shim() {
        let builder = ShimBuilder::new();
        let descriptor = double_descriptor();
        let first = builder.build(&descriptor, &HostContext::public()).unwrap();
        let second = builder.build(&descriptor, &HostContext::public()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_distinct_contexts_get_distinct_cache_slots() {
        let builder = ShimBuilder::new();
        let descriptor = double_descriptor();
        builder.build(&descriptor, &HostContext::public()).unwrap();
        builder
            .build(&descriptor, &HostContext::named("other"))
            .unwrap();
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_type_initializer_fails_fast() {
        let builder = ShimBuilder::new();
        let descriptor = MemberDescriptor::type_initializer("Widget::.cctor", "Widget");
        let err = builder
            .build(&descriptor, &HostContext::public())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMemberShape(_)));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_abstract_member_rejected() {
        let builder = ShimBuilder::new();
        let descriptor = MemberDescriptor::instance_function(
            "Shape::area",
            "Shape",
            Vec::new(),
            ParamType::R8,
            |_, _| Ok(Value::Null),
        )
        .with_flags(MemberFlags::PUBLIC | MemberFlags::ABSTRACT);
        let err = builder
            .build(&descriptor, &HostContext::public())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMemberShape(_)));
    }

    #[test]
    fn test_visibility_enforced() {
        let builder = ShimBuilder::new();
        let descriptor = MemberDescriptor::static_function(
            "Widget::secret",
            "Widget",
            Vec::new(),
            ParamType::I4,
            |_, _| Ok(Value::I4(7)),
        )
        .with_flags(MemberFlags::STATIC);

        let err = builder
            .build(&descriptor, &HostContext::public())
            .unwrap_err();
        assert!(matches!(err, Error::MemberNotAccessible { .. }));

        let granted = HostContext::named("friend").grant("Widget");
        let shim = builder.build(&descriptor, &granted).unwrap();
        assert!(matches!(shim.invoke(None, &[]).unwrap(), Value::I4(7)));
    }

    #[test]
    fn test_parameter_limits() {
        let builder = ShimBuilder::new();

        let wide = MemberDescriptor::static_function(
            "Widget::wide",
            "Widget",
            vec![ParamType::I4; MAX_STATIC_PARAMS + 1],
            ParamType::I4,
            |_, _| Ok(Value::Null),
        );
        match builder.build(&wide, &HostContext::public()).unwrap_err() {
            Error::TooManyParameters { count, max } => {
                assert_eq!(count, MAX_STATIC_PARAMS + 1);
                assert_eq!(max, MAX_STATIC_PARAMS);
            }
            other => panic!("unexpected error: {other}"),
        }

        let at_limit = MemberDescriptor::static_function(
            "Widget::at_limit",
            "Widget",
            vec![ParamType::I4; MAX_STATIC_PARAMS],
            ParamType::I4,
            |_, _| Ok(Value::Null),
        );
        assert!(builder.build(&at_limit, &HostContext::public()).is_ok());

        let instance_wide = MemberDescriptor::instance_function(
            "Widget::instance_wide",
            "Widget",
            vec![ParamType::I4; MAX_INSTANCE_PARAMS + 1],
            ParamType::I4,
            |_, _| Ok(Value::Null),
        );
        assert!(matches!(
            builder
                .build(&instance_wide, &HostContext::public())
                .unwrap_err(),
            Error::TooManyParameters { .. }
        ));
    }

    #[test]
    fn test_receiver_shape_checked() {
        let builder = ShimBuilder::new();
        let shim = builder
            .build(&double_descriptor(), &HostContext::public())
            .unwrap();

        let instance = Value::from_instance(0u8);
        assert!(matches!(
            shim.invoke(Some(&instance), &[Value::I4(1)]).unwrap_err(),
            Error::ReceiverMismatch { .. }
        ));

        let getter = MemberDescriptor::property_getter(
            "Widget::name",
            "Widget",
            ParamType::String,
            |_, _| Ok(Value::from("w")),
        );
        let getter_shim = builder.build(&getter, &HostContext::public()).unwrap();
        assert!(matches!(
            getter_shim.invoke(None, &[]).unwrap_err(),
            Error::ReceiverMismatch { .. }
        ));
    }

    #[test]
    fn test_procedure_yields_null() {
        let builder = ShimBuilder::new();
        let descriptor =
            MemberDescriptor::static_procedure("Widget::touch", "Widget", Vec::new(), |_, _| {
                Ok(Value::I4(99))
            });
        let shim = builder.build(&descriptor, &HostContext::public()).unwrap();
        assert!(shim.invoke(None, &[]).unwrap().is_null());
    }

    #[test]
    fn test_target_error_passes_through() {
        #[derive(Debug)]
        struct Boom;
        impl std::fmt::Display for Boom {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "boom")
            }
        }
        impl std::error::Error for Boom {}

        let builder = ShimBuilder::new();
        let descriptor = MemberDescriptor::static_function(
            "Widget::explode",
            "Widget",
            Vec::new(),
            ParamType::I4,
            |_, _| Err(Box::new(Boom) as crate::TargetError),
        );
        let shim = builder.build(&descriptor, &HostContext::public()).unwrap();

        let err = shim.invoke(None, &[]).unwrap_err();
        assert!(err.is_target());
        assert!(err.target_ref::<Boom>().is_some());
        assert_eq!(err.to_string(), "boom");
    }
}
