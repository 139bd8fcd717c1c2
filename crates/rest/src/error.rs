use crate::coerce::CoercionError;
use http::Method;
use std::error::Error;
use thiserror::Error;

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Top-level error of [`RestContext::handle`](crate::RestContext::handle).
#[derive(Debug, Error)]
pub enum RestError {
    #[error("invalid query string: {source}")]
    Query {
        #[from]
        source: serde_urlencoded::de::Error,
    },

    #[error("resolve error: {source}")]
    Resolve {
        #[from]
        source: ResolveError,
    },

    #[error("dispatch error: {source}")]
    Dispatch {
        #[from]
        source: DispatchError,
    },
}

/// A request that does not resolve to exactly one handler.
///
/// Both variants are answered with `404`, the candidates are listed in the body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no rest handler for {method} {path}, [] found.")]
    NotFound { method: Method, path: String },

    #[error("ambiguous rest request, [{}] found.", .candidates.join(", "))]
    Ambiguous { candidates: Vec<String> },
}

impl ResolveError {
    pub fn not_found<S: ToString>(method: &Method, path: S) -> Self {
        Self::NotFound { method: method.clone(), path: path.to_string() }
    }

    pub fn ambiguous<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::Ambiguous { candidates: candidates.into_iter().map(|c| c.to_string()).collect() }
    }
}

/// Failure after a handler was resolved, never answered with `200`.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("can't coerce query parameter '{key}' for {handler}: {source}")]
    Coercion {
        handler: &'static str,
        key: String,
        #[source]
        source: CoercionError,
    },

    #[error("{handler} takes {expected} arguments but {actual} are bound")]
    Arity { handler: &'static str, expected: usize, actual: usize },

    #[error("{handler} failed: {source}")]
    Invocation {
        handler: &'static str,
        #[source]
        source: BoxError,
    },
}

impl DispatchError {
    pub fn coercion<S: ToString>(handler: &'static str, key: S, source: CoercionError) -> Self {
        Self::Coercion { handler, key: key.to_string(), source }
    }

    pub fn invocation<E: Into<BoxError>>(handler: &'static str, source: E) -> Self {
        Self::Invocation { handler, source: source.into() }
    }
}
