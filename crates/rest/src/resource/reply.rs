//! Rendering of handler return values.
//!
//! A matched handler's return value becomes the body of a `200` response. The
//! [`Reply`] trait defines that textual form for the types a handler may return;
//! `Result` is the only way for a handler to fail a request.

use crate::coerce::Json;
use crate::error::BoxError;
use serde::Serialize;

/// A type that can be returned from a resource method.
pub trait Reply {
    fn into_reply(self) -> Result<String, BoxError>;
}

/// The `Err` variant fails the dispatch, it is never rendered.
impl<T: Reply, E: Into<BoxError>> Reply for Result<T, E> {
    fn into_reply(self) -> Result<String, BoxError> {
        match self {
            Ok(t) => t.into_reply(),
            Err(e) => Err(e.into()),
        }
    }
}

/// `None` renders as `null`.
impl<T: Reply> Reply for Option<T> {
    fn into_reply(self) -> Result<String, BoxError> {
        match self {
            Some(t) => t.into_reply(),
            None => Ok("null".to_owned()),
        }
    }
}

impl<T: Serialize> Reply for Json<T> {
    fn into_reply(self) -> Result<String, BoxError> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl Reply for () {
    fn into_reply(self) -> Result<String, BoxError> {
        Ok(String::new())
    }
}

impl Reply for String {
    #[inline]
    fn into_reply(self) -> Result<String, BoxError> {
        Ok(self)
    }
}

impl Reply for &'static str {
    #[inline]
    fn into_reply(self) -> Result<String, BoxError> {
        Ok(self.to_owned())
    }
}

macro_rules! impl_reply_for_display {
    ($($ty:ty)*) => {
        $(
        impl Reply for $ty {
            #[inline]
            fn into_reply(self) -> Result<String, BoxError> {
                Ok(self.to_string())
            }
        }
        )*
    };
}

impl_reply_for_display!(bool char i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64);
