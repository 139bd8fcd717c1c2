use crate::coerce::{CoercionError, TargetType, ValueCoercer};
use serde_json::Value;

/// Reads raw query values as json scalars.
///
/// `?flag=true` becomes `true`, `?n=42` becomes `42`, `?ids=[1,2]` becomes an array.
/// [`TargetType::Text`] takes the raw string verbatim, so `?name=bob` needs no quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCoercer;

impl JsonCoercer {
    pub fn new() -> Self {
        Self
    }

    fn coerce_present(raw: &str, target: &TargetType) -> Result<Value, CoercionError> {
        if let TargetType::Text = target {
            return Ok(Value::String(raw.to_owned()));
        }

        if let TargetType::Optional(inner) = target {
            return Self::coerce_present(raw, inner);
        }

        let value = serde_json::from_str::<Value>(raw).map_err(|_e| CoercionError::mismatch(raw, target))?;

        let accepted = match target {
            TargetType::Bool => value.is_boolean(),
            TargetType::Int => value.is_i64(),
            TargetType::UInt => value.is_u64(),
            TargetType::Float => value.is_number(),
            TargetType::Json => true,
            // handled above
            TargetType::Text | TargetType::Optional(_) => false,
        };

        if accepted { Ok(value) } else { Err(CoercionError::mismatch(raw, target)) }
    }
}

impl ValueCoercer for JsonCoercer {
    fn coerce(&self, raw: Option<&str>, target: &TargetType) -> Result<Value, CoercionError> {
        match raw {
            Some(raw) => Self::coerce_present(raw, target),
            None if target.is_optional() => Ok(Value::Null),
            None => Err(CoercionError::missing(target)),
        }
    }
}
