//! Runtime value model for call-time arguments and produced instances.
//!
//! Every invocation in this library moves through a uniform calling
//! convention: a slice of [`Value`]s in, one [`Value`] out. The enum covers
//! the primitive families the coercion engine understands plus a type-erased
//! `Instance` variant for arbitrary shared objects.
//!
//! # Key Types
//!
//! - [`Value`] - The runtime carrier enum
//! - [`ValueKind`] - Fieldless discriminant, used in diagnostics
//! - [`crate::value::coerce`] - Declared-parameter model and coercion engine
//!
//! # Examples
//!
//! ```rust
//! use dotresolve::Value;
//!
//! let n = Value::I4(42);
//! assert_eq!(n.as_i32(), Some(42));
//! assert_eq!(n.as_i64(), Some(42));
//!
//! let shared = Value::from_instance(String::from("hello"));
//! let back: std::sync::Arc<String> = shared.into_shared().unwrap();
//! assert_eq!(&*back, "hello");
//! ```

pub mod coerce;

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use strum::{Display, EnumIter};

use crate::{Error, Result};

/// Fieldless discriminant for [`Value`].
///
/// Primitive kinds follow the CLI element-type naming (`I4` is a 32-bit
/// signed integer, `R8` a 64-bit float, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ValueKind {
    /// Absent value
    Null,
    /// Boolean value
    Boolean,
    /// Character value
    Char,
    /// 8-bit signed integer
    I1,
    /// 8-bit unsigned integer
    U1,
    /// 16-bit signed integer
    I2,
    /// 16-bit unsigned integer
    U2,
    /// 32-bit signed integer
    I4,
    /// 32-bit unsigned integer
    U4,
    /// 64-bit signed integer
    I8,
    /// 64-bit unsigned integer
    U8,
    /// 32-bit floating point
    R4,
    /// 64-bit floating point
    R8,
    /// String value
    String,
    /// Type-erased shared instance
    Instance,
}

/// Runtime carrier for call-time arguments and produced instances.
///
/// Primitive variants hold their value inline; arbitrary objects travel as
/// reference-counted [`Value::Instance`] payloads. `Value` is cheap to clone.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value (absent argument, or the result of a procedure)
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Character value
    Char(char),
    /// 8-bit signed integer
    I1(i8),
    /// 8-bit unsigned integer
    U1(u8),
    /// 16-bit signed integer
    I2(i16),
    /// 16-bit unsigned integer
    U2(u16),
    /// 32-bit signed integer
    I4(i32),
    /// 32-bit unsigned integer
    U4(u32),
    /// 64-bit signed integer
    I8(i64),
    /// 64-bit unsigned integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// String value
    String(String),
    /// Type-erased shared instance
    Instance(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Returns the discriminant of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Char(_) => ValueKind::Char,
            Value::I1(_) => ValueKind::I1,
            Value::U1(_) => ValueKind::U1,
            Value::I2(_) => ValueKind::I2,
            Value::U2(_) => ValueKind::U2,
            Value::I4(_) => ValueKind::I4,
            Value::U4(_) => ValueKind::U4,
            Value::I8(_) => ValueKind::I8,
            Value::U8(_) => ValueKind::U8,
            Value::R4(_) => ValueKind::R4,
            Value::R8(_) => ValueKind::R8,
            Value::String(_) => ValueKind::String,
            Value::Instance(_) => ValueKind::Instance,
        }
    }

    /// Wraps an arbitrary object as a shared instance value.
    #[must_use]
    pub fn from_instance<T: Any + Send + Sync>(value: T) -> Self {
        Value::Instance(Arc::new(value))
    }

    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The `TypeId` of the payload carried by an instance value.
    #[must_use]
    pub fn instance_type_id(&self) -> Option<TypeId> {
        match self {
            Value::Instance(arc) => Some((**arc).type_id()),
            _ => None,
        }
    }

    /// Try to view the payload of an instance value as a concrete type.
    ///
    /// Used by instance-member bodies to reach their receiver.
    #[must_use]
    pub fn instance_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Instance(arc) => arc.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Try to view this value as a boolean.
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to view this value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Try to convert this value to an `i32`, widening smaller integers.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I1(value) => Some(i32::from(*value)),
            Value::U1(value) => Some(i32::from(*value)),
            Value::I2(value) => Some(i32::from(*value)),
            Value::U2(value) => Some(i32::from(*value)),
            Value::I4(value) => Some(*value),
            Value::U4(value) => i32::try_from(*value).ok(),
            Value::I8(value) => i32::try_from(*value).ok(),
            Value::U8(value) => i32::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Try to convert this value to an `i64`, widening smaller integers.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I1(value) => Some(i64::from(*value)),
            Value::U1(value) => Some(i64::from(*value)),
            Value::I2(value) => Some(i64::from(*value)),
            Value::U2(value) => Some(i64::from(*value)),
            Value::I4(value) => Some(i64::from(*value)),
            Value::U4(value) => Some(i64::from(*value)),
            Value::I8(value) => Some(*value),
            Value::U8(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Try to convert this value to an `i128`. Covers every integer variant.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::I1(value) => Some(i128::from(*value)),
            Value::U1(value) => Some(i128::from(*value)),
            Value::I2(value) => Some(i128::from(*value)),
            Value::U2(value) => Some(i128::from(*value)),
            Value::I4(value) => Some(i128::from(*value)),
            Value::U4(value) => Some(i128::from(*value)),
            Value::I8(value) => Some(i128::from(*value)),
            Value::U8(value) => Some(i128::from(*value)),
            _ => None,
        }
    }

    /// Try to convert this value to an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I1(value) => Some(f64::from(*value)),
            Value::U1(value) => Some(f64::from(*value)),
            Value::I2(value) => Some(f64::from(*value)),
            Value::U2(value) => Some(f64::from(*value)),
            Value::I4(value) => Some(f64::from(*value)),
            Value::U4(value) => Some(f64::from(*value)),
            #[allow(clippy::cast_precision_loss)]
            Value::I8(value) => Some(*value as f64),
            #[allow(clippy::cast_precision_loss)]
            Value::U8(value) => Some(*value as f64),
            Value::R4(value) => Some(f64::from(*value)),
            Value::R8(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `true` if the value belongs to the primitive numeric family
    /// (integer widths and floating-point widths).
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.kind(),
            ValueKind::I1
                | ValueKind::U1
                | ValueKind::I2
                | ValueKind::U2
                | ValueKind::I4
                | ValueKind::U4
                | ValueKind::I8
                | ValueKind::U8
                | ValueKind::R4
                | ValueKind::R8
        )
    }

    /// Extracts the value as a shared `Arc<T>`.
    ///
    /// Instance values downcast directly; primitive values are boxed into a
    /// fresh `Arc`. Fails with [`Error::TypeMismatch`] when the payload is of
    /// a different type.
    pub fn into_shared<T: Any + Send + Sync>(self) -> Result<Arc<T>> {
        match self {
            Value::Instance(arc) => arc.downcast::<T>().map_err(|_| Error::TypeMismatch {
                expected: type_name::<T>(),
                actual: "an instance of another type".to_string(),
            }),
            other => other.into_owned::<T>().map(Arc::new),
        }
    }

    /// Extracts the value by move, yielding `T` itself.
    ///
    /// Instance values must be unshared (reference count of one) to be handed
    /// out by value; a still-shared instance fails with
    /// [`Error::TypeMismatch`]. Primitive variants convert through a boxed
    /// downcast, so `into_owned::<i32>()` on a [`Value::I4`] succeeds.
    pub fn into_owned<T: Any + Send + Sync>(self) -> Result<T> {
        let kind = self.kind();
        match self {
            Value::Null => Err(Error::TypeMismatch {
                expected: type_name::<T>(),
                actual: "null".to_string(),
            }),
            Value::Instance(arc) => {
                let arc = arc.downcast::<T>().map_err(|_| Error::TypeMismatch {
                    expected: type_name::<T>(),
                    actual: "an instance of another type".to_string(),
                })?;
                Arc::try_unwrap(arc).map_err(|_| Error::TypeMismatch {
                    expected: type_name::<T>(),
                    actual: "a still-shared instance".to_string(),
                })
            }
            other => {
                let boxed: Box<dyn Any> = match other {
                    Value::Boolean(v) => Box::new(v),
                    Value::Char(v) => Box::new(v),
                    Value::I1(v) => Box::new(v),
                    Value::U1(v) => Box::new(v),
                    Value::I2(v) => Box::new(v),
                    Value::U2(v) => Box::new(v),
                    Value::I4(v) => Box::new(v),
                    Value::U4(v) => Box::new(v),
                    Value::I8(v) => Box::new(v),
                    Value::U8(v) => Box::new(v),
                    Value::R4(v) => Box::new(v),
                    Value::R8(v) => Box::new(v),
                    Value::String(v) => Box::new(v),
                    Value::Null | Value::Instance(_) => unreachable!(),
                };
                boxed
                    .downcast::<T>()
                    .map(|boxed| *boxed)
                    .map_err(|_| Error::TypeMismatch {
                        expected: type_name::<T>(),
                        actual: format!("a value of kind {kind}"),
                    })
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::I1(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::U1(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::I2(value)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::U2(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I4(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::U4(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I8(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U8(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::R4(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::R8(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::I4(1).kind(), ValueKind::I4);
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::from_instance(3u128).kind(), ValueKind::Instance);
    }

    #[test]
    fn test_numeric_widening() {
        assert_eq!(Value::I1(-5).as_i32(), Some(-5));
        assert_eq!(Value::U8(u64::MAX).as_i64(), None);
        assert_eq!(Value::U8(u64::MAX).as_i128(), Some(i128::from(u64::MAX)));
        assert_eq!(Value::U2(7).as_f64(), Some(7.0));
        assert_eq!(Value::Boolean(true).as_i32(), None);
    }

    #[test]
    fn test_into_owned_primitives() {
        assert_eq!(Value::I4(42).into_owned::<i32>().unwrap(), 42);
        assert_eq!(
            Value::from("hello").into_owned::<String>().unwrap(),
            "hello"
        );

        let err = Value::I4(42).into_owned::<String>().unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_into_owned_instance() {
        struct Widget(&'static str);

        let value = Value::from_instance(Widget("a"));
        let widget = value.into_owned::<Widget>().unwrap();
        assert_eq!(widget.0, "a");
    }

    #[test]
    fn test_into_owned_rejects_shared_instance() {
        let arc: Arc<dyn Any + Send + Sync> = Arc::new(17u32);
        let clone = arc.clone();
        let err = Value::Instance(arc).into_owned::<u32>().unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        drop(clone);
    }

    #[test]
    fn test_into_shared() {
        let shared = Value::from_instance(String::from("s"))
            .into_shared::<String>()
            .unwrap();
        assert_eq!(&*shared, "s");

        let boxed = Value::Boolean(true).into_shared::<bool>().unwrap();
        assert!(*boxed);
    }

    #[test]
    fn test_null_never_extracts() {
        assert!(Value::Null.into_owned::<i32>().is_err());
    }
}
