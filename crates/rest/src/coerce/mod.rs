//! Conversion of raw query values into typed handler arguments.
//!
//! Coercion happens in two steps:
//! - a [`ValueCoercer`] turns the raw query string (or its absence) into a
//!   [`serde_json::Value`] shaped after the parameter's [`TargetType`]
//! - the parameter's [`QueryArg`] impl turns that value into the Rust type the
//!   handler declared
//!
//! The coercer is injected into the [`RestContext`](crate::RestContext), so it
//! can be replaced without touching any resource. [`JsonCoercer`] is the default.

mod json_coercer;
mod query_arg;

pub use json_coercer::JsonCoercer;
pub use query_arg::Json;
pub use query_arg::QueryArg;

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The type a handler parameter expects, as seen by the coercer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    Bool,
    Int,
    UInt,
    Float,
    Text,
    /// any json value, deserialized by the parameter type itself
    Json,
    Optional(Box<TargetType>),
}

impl TargetType {
    /// Wraps `inner` so a missing query value coerces to `null`.
    pub fn optional(inner: TargetType) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::UInt => f.write_str("uint"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
            Self::Optional(inner) => write!(f, "optional {inner}"),
        }
    }
}

/// Converts a raw query value into a value of the requested [`TargetType`].
///
/// `raw` is `None` when the request carries no value for the parameter's key.
/// Implementations must be shareable across threads, one coercer serves every request.
pub trait ValueCoercer: Send + Sync {
    fn coerce(&self, raw: Option<&str>, target: &TargetType) -> Result<Value, CoercionError>;
}

impl<C: ValueCoercer + ?Sized> ValueCoercer for Box<C> {
    fn coerce(&self, raw: Option<&str>, target: &TargetType) -> Result<Value, CoercionError> {
        (**self).coerce(raw, target)
    }
}

#[derive(Error, Debug)]
pub enum CoercionError {
    #[error("missing value for {expected} parameter")]
    Missing { expected: TargetType },

    #[error("can't coerce '{raw}' into {expected}")]
    Mismatch { raw: String, expected: TargetType },

    #[error("invalid value: {source}")]
    Invalid {
        #[from]
        source: serde_json::Error,
    },
}

impl CoercionError {
    pub fn missing(expected: &TargetType) -> Self {
        Self::Missing { expected: expected.clone() }
    }

    pub fn mismatch<S: ToString>(raw: S, expected: &TargetType) -> Self {
        Self::Mismatch { raw: raw.to_string(), expected: expected.clone() }
    }
}
