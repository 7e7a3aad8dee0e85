//! The service locator: registration and resolution of abstractions.
//!
//! A [`Resolver`] owns two independent strategy namespaces keyed by the same
//! abstraction types - singletons (fixed or lazily materialized, shared for
//! the resolver's lifetime) and per-call factories (a fresh instance per
//! resolution). Callers must use the accessor matching the namespace they
//! registered against: [`Resolver::get_singleton`] never falls back to a
//! factory registration and vice versa.
//!
//! Factories come in three flavors: plain closures with a declared parameter
//! list, member descriptors compiled through the resolver's shim cache, and
//! automatic constructor registration via the [`Injectable`] trait. Call-time
//! arguments are coerced against the declared parameter types before any
//! invocation, and errors raised inside a registered target pass through to
//! the caller unchanged.

use std::any::{type_name, Any};
use std::sync::{Arc, OnceLock, RwLock};

use crate::locator::registry::RegistrationTable;
use crate::locator::singleton::{LazySlot, Shared, SingletonStrategy};
use crate::locator::AbstractionKey;
use crate::shim::{HostContext, MemberDescriptor, MemberFlags, MemberKind, Shim, ShimBuilder};
use crate::value::coerce::coerce_all;
use crate::{Error, ParamType, Result, TargetError, Value};

/// Direct factory body registered from a closure.
type FactoryBody =
    Arc<dyn Fn(&[Value]) -> std::result::Result<Value, TargetError> + Send + Sync>;

/// Post-invocation conversion from the implementation type to the abstraction
/// type, used by automatic constructor registration.
type Converter = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// How a per-call factory registration produces its value.
#[derive(Clone)]
pub(crate) enum FactoryStrategy {
    /// Closure with a declared parameter list, invoked directly.
    Closure {
        params: Arc<[ParamType]>,
        body: FactoryBody,
    },
    /// Member descriptor compiled to a shim, optionally bound to a receiver
    /// instance (property getters, instance methods) and optionally followed
    /// by an implementation-to-abstraction conversion.
    Shim {
        shim: Arc<Shim>,
        instance: Option<Value>,
        convert: Option<Converter>,
    },
}

impl std::fmt::Debug for FactoryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactoryStrategy::Closure { params, .. } => f
                .debug_struct("FactoryStrategy::Closure")
                .field("params", params)
                .finish_non_exhaustive(),
            FactoryStrategy::Shim { shim, .. } => f
                .debug_struct("FactoryStrategy::Shim")
                .field("shim", shim)
                .finish_non_exhaustive(),
        }
    }
}

/// Registration-time constructor table for a type.
///
/// Rust has no runtime constructor discovery, so types opt in by listing
/// their constructor descriptors. [`Resolver::register_constructor`] consults
/// this table and requires exactly one public constructor.
///
/// # Examples
///
/// ```rust
/// use dotresolve::{Injectable, MemberDescriptor, ParamType, Value};
///
/// struct Widget {
///     label: String,
/// }
///
/// impl Injectable for Widget {
///     fn constructors() -> Vec<MemberDescriptor> {
///         vec![MemberDescriptor::constructor(
///             "Widget::new",
///             "Widget",
///             vec![ParamType::String],
///             ParamType::of::<Widget>(),
///             |_, args| {
///                 let label = args[0].as_str().unwrap_or_default().to_string();
///                 Ok(Value::from_instance(Widget { label }))
///             },
///         )]
///     }
/// }
/// ```
pub trait Injectable: Sized + Any + Send + Sync {
    /// All constructor descriptors this type exposes.
    fn constructors() -> Vec<MemberDescriptor>;
}

/// Registration and resolution of abstractions.
///
/// See the [module documentation](self) for the registration model. The
/// resolver exclusively owns its registration tables and shim cache; dropped
/// registrations disappear with the resolver (or on [`Resolver::reset`]).
///
/// All operations are safe to call concurrently from any thread.
///
/// # Examples
///
/// ```rust
/// use dotresolve::{ParamType, Resolver, Value};
///
/// struct Greeting(String);
///
/// let resolver = Resolver::new();
/// resolver.register_factory(vec![ParamType::String], |args: &[Value]| {
///     let name = args[0].as_str().unwrap_or_default();
///     Ok(Greeting(format!("hello, {name}")))
/// });
///
/// let greeting = resolver.get::<Greeting>(&[Value::from("world")])?;
/// assert_eq!(greeting.0, "hello, world");
/// # Ok::<(), dotresolve::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Resolver {
    singletons: RegistrationTable<SingletonStrategy>,
    factories: RegistrationTable<FactoryStrategy>,
    shims: ShimBuilder,
}

impl Resolver {
    /// Creates an empty resolver with its own shim cache.
    #[must_use]
    pub fn new() -> Self {
        Resolver {
            singletons: RegistrationTable::new(),
            factories: RegistrationTable::new(),
            shims: ShimBuilder::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Singleton namespace
    // ---------------------------------------------------------------------

    /// Registers a fixed singleton instance for `T`.
    ///
    /// Returns `false` (and keeps the existing registration) if `T` already
    /// has a singleton registration.
    pub fn register_singleton<T: Any + Send + Sync>(&self, value: T) -> bool {
        self.singletons.register(
            AbstractionKey::of::<T>(),
            SingletonStrategy::Fixed(Arc::new(value)),
        )
    }

    /// Registers a lazy singleton factory for `T`.
    ///
    /// The factory is invoked at most once on the success path, on the first
    /// [`Resolver::get_singleton`] call; the produced value is cached and
    /// shared for the resolver's lifetime. A factory failure leaves the
    /// registration pending so a later call retries.
    pub fn register_singleton_with<T, F>(&self, factory: F) -> bool
    where
        T: Any + Send + Sync,
        F: Fn() -> std::result::Result<T, TargetError> + Send + Sync + 'static,
    {
        let slot = LazySlot::new(Box::new(move || factory().map(|v| Arc::new(v) as Shared)));
        self.singletons.register(
            AbstractionKey::of::<T>(),
            SingletonStrategy::Lazy(Arc::new(slot)),
        )
    }

    /// Resolves the singleton registration for `T`.
    ///
    /// Singleton and factory registrations are distinct namespaces: this
    /// method fails with [`Error::NotRegistered`] when `T` has no singleton
    /// registration, even if a per-call factory exists for `T`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotRegistered`] when `T` has no singleton registration.
    /// - [`Error::Target`] carrying a lazy factory's original error.
    pub fn get_singleton<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        let key = AbstractionKey::of::<T>();
        let strategy = self.singletons.lookup(&key).ok_or(Error::NotRegistered {
            type_name: key.name(),
            namespace: "singleton",
        })?;

        strategy
            .get()?
            .downcast::<T>()
            .map_err(|_| Error::TypeMismatch {
                expected: key.name(),
                actual: "an instance of another type".to_string(),
            })
    }

    /// Whether `T` has a singleton registration.
    #[must_use]
    pub fn has_singleton<T: Any>(&self) -> bool {
        self.singletons.contains(&AbstractionKey::of::<T>())
    }

    // ---------------------------------------------------------------------
    // Factory namespace
    // ---------------------------------------------------------------------

    /// Registers a per-call closure factory for `T`.
    ///
    /// `params` declares the factory's parameter list; call-time arguments
    /// are coerced against it before the closure runs. Returns `false` if
    /// `T` already has a factory registration.
    pub fn register_factory<T, F>(&self, params: Vec<ParamType>, factory: F) -> bool
    where
        T: Any + Send + Sync,
        F: Fn(&[Value]) -> std::result::Result<T, TargetError> + Send + Sync + 'static,
    {
        let body: FactoryBody = Arc::new(move |args| factory(args).map(Value::from_instance));
        self.factories.register(
            AbstractionKey::of::<T>(),
            FactoryStrategy::Closure {
                params: params.into(),
                body,
            },
        )
    }

    /// Registers a member descriptor (constructor or static method/function)
    /// as the per-call factory for `T`.
    ///
    /// The descriptor is compiled through this resolver's shim cache at
    /// registration time, so shape, arity, and visibility problems surface
    /// here rather than at the first `get` call.
    ///
    /// # Errors
    ///
    /// - Shim build errors ([`Error::UnsupportedMemberShape`],
    ///   [`Error::TooManyParameters`], [`Error::MemberNotAccessible`]).
    /// - [`Error::UnsupportedMemberShape`] when the member is a procedure
    ///   (factories must produce a value).
    /// - [`Error::ReceiverMismatch`] for instance-shaped members; bind those
    ///   with [`Resolver::register_bound_factory`].
    pub fn register_member_factory<T: Any + Send + Sync>(
        &self,
        descriptor: &MemberDescriptor,
        context: &HostContext,
    ) -> Result<bool> {
        if descriptor.kind().requires_instance() {
            return Err(Error::ReceiverMismatch {
                member: descriptor.id().to_string(),
                expected: "no instance receiver; bind one with register_bound_factory",
            });
        }
        self.register_shim_factory::<T>(descriptor, context, None)
    }

    /// Registers an instance-shaped member (property getter or instance
    /// method/function) bound to a receiver as the per-call factory for `T`.
    ///
    /// # Errors
    ///
    /// Shim build errors, plus [`Error::ReceiverMismatch`] when the member
    /// is not instance-shaped.
    pub fn register_bound_factory<T: Any + Send + Sync>(
        &self,
        descriptor: &MemberDescriptor,
        context: &HostContext,
        instance: Value,
    ) -> Result<bool> {
        if !descriptor.kind().requires_instance() {
            return Err(Error::ReceiverMismatch {
                member: descriptor.id().to_string(),
                expected: "an instance receiver; static members use register_member_factory",
            });
        }
        self.register_shim_factory::<T>(descriptor, context, Some(instance))
    }

    fn register_shim_factory<T: Any + Send + Sync>(
        &self,
        descriptor: &MemberDescriptor,
        context: &HostContext,
        instance: Option<Value>,
    ) -> Result<bool> {
        if !descriptor.kind().has_return() {
            return Err(Error::UnsupportedMemberShape(format!(
                "'{}' is a procedure and cannot back a factory",
                descriptor.id()
            )));
        }

        let shim = self.shims.build(descriptor, context)?;
        Ok(self.factories.register(
            AbstractionKey::of::<T>(),
            FactoryStrategy::Shim {
                shim,
                instance,
                convert: None,
            },
        ))
    }

    /// Automatically registers `TImpl`'s single public constructor as the
    /// per-call factory for `TAbs`.
    ///
    /// `TImpl` lists its constructors through [`Injectable`]; exactly one
    /// public constructor is required. The constructed `TImpl` converts into
    /// `TAbs` via `Into`, which is the identity when the two types coincide.
    ///
    /// # Errors
    ///
    /// [`Error::AmbiguousConstructor`] when `TImpl` exposes zero or multiple
    /// public constructors, plus any shim build error. A duplicate key is not
    /// an error: it yields `Ok(false)`.
    pub fn register_constructor<TAbs, TImpl>(&self) -> Result<bool>
    where
        TAbs: Any + Send + Sync,
        TImpl: Injectable + Into<TAbs>,
    {
        let mut constructors: Vec<MemberDescriptor> = TImpl::constructors()
            .into_iter()
            .filter(|descriptor| {
                descriptor.kind() == MemberKind::Constructor
                    && descriptor.flags().contains(MemberFlags::PUBLIC)
            })
            .collect();

        if constructors.len() != 1 {
            return Err(Error::AmbiguousConstructor {
                type_name: type_name::<TImpl>(),
                found: constructors.len(),
            });
        }

        let descriptor = constructors.remove(0);
        let shim = self.shims.build(&descriptor, &HostContext::public())?;
        let convert: Converter = Arc::new(|value: Value| {
            let implementation = value.into_owned::<TImpl>()?;
            Ok(Value::from_instance::<TAbs>(implementation.into()))
        });

        Ok(self.factories.register(
            AbstractionKey::of::<TAbs>(),
            FactoryStrategy::Shim {
                shim,
                instance: None,
                convert: Some(convert),
            },
        ))
    }

    /// Resolves `T` through its per-call factory registration.
    ///
    /// Arguments are coerced against the factory's declared parameter list;
    /// the factory then produces a fresh instance owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::NotRegistered`] when `T` has no factory registration.
    /// - [`Error::ArgumentCount`] / [`Error::ArgumentCoercion`] when the
    ///   supplied arguments do not fit the declared parameters.
    /// - [`Error::Target`] carrying the factory body's original error,
    ///   unchanged.
    pub fn get<T: Any + Send + Sync>(&self, args: &[Value]) -> Result<T> {
        let key = AbstractionKey::of::<T>();
        let strategy = self.factories.lookup(&key).ok_or(Error::NotRegistered {
            type_name: key.name(),
            namespace: "factory",
        })?;

        let produced = match strategy {
            FactoryStrategy::Closure { params, body } => {
                let coerced = coerce_all(&params, args)?;
                body(&coerced).map_err(Error::Target)?
            }
            FactoryStrategy::Shim {
                shim,
                instance,
                convert,
            } => {
                let coerced = coerce_all(shim.params(), args)?;
                let value = shim.invoke(instance.as_ref(), &coerced)?;
                match convert {
                    Some(convert) => convert(value)?,
                    None => value,
                }
            }
        };

        produced.into_owned::<T>()
    }

    /// Whether `T` has a per-call factory registration.
    #[must_use]
    pub fn has_factory<T: Any>(&self) -> bool {
        self.factories.contains(&AbstractionKey::of::<T>())
    }

    /// Number of registrations across both namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.singletons.len() + self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every registration from both namespaces.
    pub fn reset(&self) {
        self.singletons.clear();
        self.factories.clear();
    }

    // ---------------------------------------------------------------------
    // Process-wide instance management
    // ---------------------------------------------------------------------

    /// The process-wide default resolver, lazily constructed once.
    pub fn default_instance() -> Arc<Resolver> {
        DEFAULT_INSTANCE
            .get_or_init(|| Arc::new(Resolver::new()))
            .clone()
    }

    /// The current process-wide resolver.
    ///
    /// Defaults to [`Resolver::default_instance`] until redirected with
    /// [`Resolver::set_instance`]. This is an explicit, documented global:
    /// library code can resolve dependencies through a well-known access
    /// point without threading a resolver reference through every caller.
    pub fn instance() -> Arc<Resolver> {
        if let Some(current) = read_lock!(CURRENT_INSTANCE).as_ref() {
            return current.clone();
        }
        Resolver::default_instance()
    }

    /// Redirects the process-wide resolver pointer.
    pub fn set_instance(resolver: Arc<Resolver>) {
        *write_lock!(CURRENT_INSTANCE) = Some(resolver);
    }

    /// Restores the process-wide resolver pointer to the default instance.
    pub fn reset_to_default() {
        *write_lock!(CURRENT_INSTANCE) = None;
    }
}

static DEFAULT_INSTANCE: OnceLock<Arc<Resolver>> = OnceLock::new();
static CURRENT_INSTANCE: RwLock<Option<Arc<Resolver>>> = RwLock::new(None);
