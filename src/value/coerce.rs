//! Argument coercion engine.
//!
//! Maps supplied call-time [`Value`]s onto declared parameter types before a
//! shim is invoked. The rules apply in a fixed order, per argument position:
//!
//! 1. the value's dynamic type already satisfies the declared type - kept
//!    unchanged;
//! 2. both sides belong to the primitive numeric family - numeric conversion
//!    (integer narrowing is range-checked, floats convert to integers only
//!    when they carry no fraction);
//! 3. the declared type parses from a string and the value is string-like -
//!    parsed, with the parse error as the rejection reason on failure;
//! 4. otherwise rejected with a type-mismatch reason.
//!
//! A `Null` value supplied for a non-optional declared type is always
//! rejected; [`ParamType::Optional`] declares nullability explicitly.
//!
//! All positions must succeed for a call to proceed; the first rejected
//! position fails the whole resolution with [`Error::ArgumentCoercion`].

use std::any::{type_name, Any, TypeId};
use std::fmt;

use crate::{Error, Result, Value, ValueKind};

/// Declared type of a single target parameter.
///
/// Primitive kinds mirror [`ValueKind`]; `Instance` identifies an arbitrary
/// object type by its `TypeId`, and `Optional` marks a parameter that accepts
/// [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Boolean parameter
    Boolean,
    /// Character parameter
    Char,
    /// 8-bit signed integer parameter
    I1,
    /// 8-bit unsigned integer parameter
    U1,
    /// 16-bit signed integer parameter
    I2,
    /// 16-bit unsigned integer parameter
    U2,
    /// 32-bit signed integer parameter
    I4,
    /// 32-bit unsigned integer parameter
    U4,
    /// 64-bit signed integer parameter
    I8,
    /// 64-bit unsigned integer parameter
    U8,
    /// 32-bit floating point parameter
    R4,
    /// 64-bit floating point parameter
    R8,
    /// String parameter
    String,
    /// Arbitrary object parameter, identified by type
    Instance {
        /// `TypeId` of the expected object type
        id: TypeId,
        /// Captured type name, for diagnostics only
        name: &'static str,
    },
    /// Nullable parameter wrapping an inner declared type
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Declares an object parameter of type `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        ParamType::Instance {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Wraps a declared type as nullable.
    #[must_use]
    pub fn optional(inner: ParamType) -> Self {
        ParamType::Optional(Box::new(inner))
    }

    /// Returns `true` for integer and floating-point parameter kinds.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ParamType::I1
                | ParamType::U1
                | ParamType::I2
                | ParamType::U2
                | ParamType::I4
                | ParamType::U4
                | ParamType::I8
                | ParamType::U8
                | ParamType::R4
                | ParamType::R8
        )
    }

    /// Returns `true` for declared types that support a standard
    /// string-to-value parse operation.
    #[must_use]
    pub fn parses_from_string(&self) -> bool {
        self.is_numeric() || matches!(self, ParamType::Boolean | ParamType::Char)
    }

    /// Whether `value`'s dynamic type already satisfies this declared type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::Boolean => value.kind() == ValueKind::Boolean,
            ParamType::Char => value.kind() == ValueKind::Char,
            ParamType::I1 => value.kind() == ValueKind::I1,
            ParamType::U1 => value.kind() == ValueKind::U1,
            ParamType::I2 => value.kind() == ValueKind::I2,
            ParamType::U2 => value.kind() == ValueKind::U2,
            ParamType::I4 => value.kind() == ValueKind::I4,
            ParamType::U4 => value.kind() == ValueKind::U4,
            ParamType::I8 => value.kind() == ValueKind::I8,
            ParamType::U8 => value.kind() == ValueKind::U8,
            ParamType::R4 => value.kind() == ValueKind::R4,
            ParamType::R8 => value.kind() == ValueKind::R8,
            ParamType::String => value.kind() == ValueKind::String,
            ParamType::Instance { id, .. } => value.instance_type_id() == Some(*id),
            ParamType::Optional(inner) => value.is_null() || inner.accepts(value),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Instance { name, .. } => write!(f, "{name}"),
            ParamType::Optional(inner) => write!(f, "Optional<{inner}>"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Outcome of coercing one supplied argument against one declared parameter.
#[derive(Debug, Clone)]
pub enum CoercionOutcome {
    /// The value satisfies the declared type as-is.
    Unchanged,
    /// The value was converted; the replacement is carried here.
    Converted(Value),
    /// The value cannot be used; the reason describes why.
    Rejected(String),
}

/// Coerces a single supplied value against a declared parameter type.
///
/// Applies the rules documented at module level, in order. This function
/// never fails; impossibility is reported as [`CoercionOutcome::Rejected`].
#[must_use]
pub fn coerce(declared: &ParamType, value: &Value) -> CoercionOutcome {
    if let ParamType::Optional(inner) = declared {
        if value.is_null() {
            return CoercionOutcome::Unchanged;
        }
        return coerce(inner, value);
    }

    if value.is_null() {
        return CoercionOutcome::Rejected(format!(
            "null supplied for non-optional parameter of type {declared}"
        ));
    }

    if declared.accepts(value) {
        return CoercionOutcome::Unchanged;
    }

    if declared.is_numeric() && value.is_numeric() {
        return convert_numeric(declared, value);
    }

    if declared.parses_from_string() {
        if let Some(text) = value.as_str() {
            return parse_from_string(declared, text);
        }
    }

    CoercionOutcome::Rejected(format!(
        "expected {declared}, found a value of kind {}",
        value.kind()
    ))
}

/// Coerces every argument position against the declared parameter list.
///
/// # Errors
///
/// - [`Error::ArgumentCount`] when the argument count does not match the
///   parameter count.
/// - [`Error::ArgumentCoercion`] for the first rejected position.
pub fn coerce_all(params: &[ParamType], args: &[Value]) -> Result<Vec<Value>> {
    if params.len() != args.len() {
        return Err(Error::ArgumentCount {
            expected: params.len(),
            supplied: args.len(),
        });
    }

    let mut coerced = Vec::with_capacity(args.len());
    for (position, (declared, value)) in params.iter().zip(args.iter()).enumerate() {
        match coerce(declared, value) {
            CoercionOutcome::Unchanged => coerced.push(value.clone()),
            CoercionOutcome::Converted(replacement) => coerced.push(replacement),
            CoercionOutcome::Rejected(reason) => {
                return Err(Error::ArgumentCoercion { position, reason })
            }
        }
    }

    Ok(coerced)
}

/// Numeric family conversion. Integer targets are range-checked; float
/// sources convert to integers only when they carry no fractional part.
fn convert_numeric(declared: &ParamType, value: &Value) -> CoercionOutcome {
    if matches!(declared, ParamType::R4 | ParamType::R8) {
        let float = match value.as_f64() {
            Some(float) => float,
            None => {
                return CoercionOutcome::Rejected(format!(
                    "cannot read a value of kind {} as a float",
                    value.kind()
                ))
            }
        };
        return match declared {
            #[allow(clippy::cast_possible_truncation)]
            ParamType::R4 => CoercionOutcome::Converted(Value::R4(float as f32)),
            _ => CoercionOutcome::Converted(Value::R8(float)),
        };
    }

    let wide = match value.as_i128() {
        Some(wide) => wide,
        None => {
            let float = match value.as_f64() {
                Some(float) => float,
                None => {
                    return CoercionOutcome::Rejected(format!(
                        "cannot read a value of kind {} as a number",
                        value.kind()
                    ))
                }
            };
            if !float.is_finite() || float.fract() != 0.0 {
                return CoercionOutcome::Rejected(format!(
                    "float value {float} has no exact integer representation"
                ));
            }
            #[allow(clippy::cast_possible_truncation)]
            let truncated = float as i128;
            truncated
        }
    };

    match narrow_integer(declared, wide) {
        Some(converted) => CoercionOutcome::Converted(converted),
        None => CoercionOutcome::Rejected(format!("value {wide} is out of range for {declared}")),
    }
}

/// Range-checked narrowing of a wide integer into the declared integer kind.
fn narrow_integer(declared: &ParamType, wide: i128) -> Option<Value> {
    match declared {
        ParamType::I1 => i8::try_from(wide).ok().map(Value::I1),
        ParamType::U1 => u8::try_from(wide).ok().map(Value::U1),
        ParamType::I2 => i16::try_from(wide).ok().map(Value::I2),
        ParamType::U2 => u16::try_from(wide).ok().map(Value::U2),
        ParamType::I4 => i32::try_from(wide).ok().map(Value::I4),
        ParamType::U4 => u32::try_from(wide).ok().map(Value::U4),
        ParamType::I8 => i64::try_from(wide).ok().map(Value::I8),
        ParamType::U8 => u64::try_from(wide).ok().map(Value::U8),
        _ => None,
    }
}

/// Standard string-to-value parse for the declared primitive kinds.
fn parse_from_string(declared: &ParamType, text: &str) -> CoercionOutcome {
    let text = text.trim();
    let parsed = match declared {
        ParamType::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(format!("'{text}' is not a valid Boolean"))
            }
        }
        ParamType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(format!("'{text}' is not a single character")),
            }
        }
        ParamType::I1 => text.parse::<i8>().map(Value::I1).map_err(|e| e.to_string()),
        ParamType::U1 => text.parse::<u8>().map(Value::U1).map_err(|e| e.to_string()),
        ParamType::I2 => text
            .parse::<i16>()
            .map(Value::I2)
            .map_err(|e| e.to_string()),
        ParamType::U2 => text
            .parse::<u16>()
            .map(Value::U2)
            .map_err(|e| e.to_string()),
        ParamType::I4 => text
            .parse::<i32>()
            .map(Value::I4)
            .map_err(|e| e.to_string()),
        ParamType::U4 => text
            .parse::<u32>()
            .map(Value::U4)
            .map_err(|e| e.to_string()),
        ParamType::I8 => text
            .parse::<i64>()
            .map(Value::I8)
            .map_err(|e| e.to_string()),
        ParamType::U8 => text
            .parse::<u64>()
            .map(Value::U8)
            .map_err(|e| e.to_string()),
        ParamType::R4 => text
            .parse::<f32>()
            .map(Value::R4)
            .map_err(|e| e.to_string()),
        ParamType::R8 => text
            .parse::<f64>()
            .map(Value::R8)
            .map_err(|e| e.to_string()),
        _ => Err(format!("{declared} does not parse from a string")),
    };

    match parsed {
        Ok(value) => CoercionOutcome::Converted(value),
        Err(reason) => CoercionOutcome::Rejected(reason),
    }
}
