//! Handler parameter types that can be read from a query value.
//!
//! Every parameter of a resource method implements [`QueryArg`]: it names the
//! [`TargetType`] handed to the coercer, then converts the coerced value into
//! itself. Structured values go through the [`Json`] wrapper.
//!
//! # Example
//! ```
//! # use serde::Deserialize;
//! # use micro_rest::coerce::Json;
//! # #[allow(dead_code)]
//! #[derive(Deserialize, Debug)]
//! struct Range {
//!     from: u32,
//!     to: u32,
//! }
//!
//! # #[allow(dead_code)]
//! struct Calendar;
//!
//! impl Calendar {
//!     fn days(&self, Json(range): Json<Range>) -> String {
//!         format!("{} days", range.to - range.from)
//!     }
//! }
//! ```

use crate::coerce::{CoercionError, TargetType};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub trait QueryArg: Sized {
    fn target_type() -> TargetType;

    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

/// Represented as a json query value
///
/// `?range={"from":1,"to":3}` can be injected into any [`DeserializeOwned`] type,
/// and a handler returning `Json<T>` replies with `T` serialized as json.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

macro_rules! impl_query_arg {
    ($target:ident, $($ty:ty)*) => {
        $(
        impl QueryArg for $ty {
            #[inline]
            fn target_type() -> TargetType {
                TargetType::$target
            }

            #[inline]
            fn from_value(value: Value) -> Result<Self, CoercionError> {
                Ok(serde_json::from_value(value)?)
            }
        }
        )*
    };
}

impl_query_arg!(Bool, bool);
impl_query_arg!(Int, i8 i16 i32 i64 isize);
impl_query_arg!(UInt, u8 u16 u32 u64 usize);
impl_query_arg!(Float, f32 f64);
impl_query_arg!(Text, String);

impl<T: QueryArg> QueryArg for Option<T> {
    fn target_type() -> TargetType {
        TargetType::optional(T::target_type())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: DeserializeOwned> QueryArg for Json<T> {
    fn target_type() -> TargetType {
        TargetType::Json
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(Json(serde_json::from_value(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn target_types() {
        assert_eq!(bool::target_type(), TargetType::Bool);
        assert_eq!(i64::target_type(), TargetType::Int);
        assert_eq!(u16::target_type(), TargetType::UInt);
        assert_eq!(f64::target_type(), TargetType::Float);
        assert_eq!(String::target_type(), TargetType::Text);
        assert_eq!(Option::<bool>::target_type(), TargetType::optional(TargetType::Bool));
        assert_eq!(Json::<Point>::target_type(), TargetType::Json);
    }

    #[test]
    fn from_value_out_of_range() {
        assert_eq!(u8::from_value(json!(255)).unwrap(), 255);
        assert!(matches!(u8::from_value(json!(256)), Err(CoercionError::Invalid { .. })));
        assert!(matches!(i8::from_value(json!(-129)), Err(CoercionError::Invalid { .. })));
    }

    #[test]
    fn from_value_option() {
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(json!(3)).unwrap(), Some(3));
    }

    #[test]
    fn from_value_json() {
        let Json(point) = Json::<Point>::from_value(json!({"x": 1, "y": -2})).unwrap();
        assert_eq!(point, Point { x: 1, y: -2 });

        assert!(Json::<Point>::from_value(json!({"x": 1})).is_err());
    }
}
