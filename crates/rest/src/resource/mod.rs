//! Resource declaration module.
//!
//! A resource is any application object whose methods serve GET requests. Instead
//! of being discovered at runtime, its handlers are listed once per type in
//! [`Resource::declare`], each with the same markers an annotated method would carry:
//! - an HTTP method marker ([`MethodDecl::get`])
//! - a literal path ([`MethodDecl::path`])
//! - per parameter, in order, an optional query key ([`MethodDecl::query`])
//!
//! # Example
//!
//! ```
//! use micro_rest::resource::{method, Methods, Resource};
//!
//! struct Weather;
//!
//! impl Weather {
//!     fn today(&self) -> &'static str {
//!         "sunny"
//!     }
//!
//!     fn forecast(&self, days: u8, city: Option<String>) -> String {
//!         format!("{days} days of sun in {}", city.as_deref().unwrap_or("town"))
//!     }
//! }
//!
//! impl Resource for Weather {
//!     fn declare(methods: &mut Methods<Self>) {
//!         methods
//!             .add(method(Self::today).get().path("/weather"))
//!             .add(method(Self::forecast).get().path("/weather").query("days").query("city"));
//!     }
//! }
//! ```

mod fn_trait;
mod reply;

pub use fn_trait::InvokeError;
pub use fn_trait::ResourceMethod;
pub use reply::Reply;

use crate::coerce::TargetType;
use http::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An application object exposing GET handlers.
///
/// Resources are shared between concurrent requests and only ever called through
/// `&self`, so any mutable state must be synchronized by the resource itself.
pub trait Resource: Sized + Send + Sync + 'static {
    /// Lists the handler methods of this resource type.
    fn declare(methods: &mut Methods<Self>);
}

pub(crate) type ErasedCall<R> = dyn Fn(&R, Vec<Value>) -> Result<String, InvokeError> + Send + Sync;

/// The method table a [`Resource`] fills in.
pub struct Methods<R> {
    decls: Vec<MethodDecl<R>>,
}

impl<R> Methods<R> {
    pub(crate) fn new() -> Self {
        Self { decls: vec![] }
    }

    /// Adds a method declaration to the table.
    pub fn add(&mut self, decl: MethodDecl<R>) -> &mut Self {
        self.decls.push(decl);
        self
    }

    pub(crate) fn into_decls(self) -> Vec<MethodDecl<R>> {
        self.decls
    }
}

impl<R> fmt::Debug for Methods<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Methods").field("decls", &self.decls).finish()
    }
}

/// Marker attached to a single handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamMarker {
    /// the parameter is read from the named query key
    Query(String),
    /// the parameter names a path variable, path templates are not matched so it is never bound
    Path(String),
    Unbound,
}

/// A single handler method together with its markers.
pub struct MethodDecl<R> {
    name: &'static str,
    http_method: Option<Method>,
    path: Option<String>,
    params: Vec<ParamMarker>,
    target_types: Vec<TargetType>,
    call: Arc<ErasedCall<R>>,
}

/// Starts the declaration of handler `f`.
///
/// The declaration is named after the function's type name until [`MethodDecl::named`] is used.
pub fn method<R, Args, F>(f: F) -> MethodDecl<R>
where
    F: ResourceMethod<R, Args>,
    R: 'static,
    Args: 'static,
{
    MethodDecl {
        name: type_name_tail(std::any::type_name::<F>(), 2),
        http_method: None,
        path: None,
        params: vec![],
        target_types: F::target_types(),
        call: Arc::new(move |resource: &R, args: Vec<Value>| f.call(resource, args)),
    }
}

/// Keeps the last `segments` path segments of a type name, with 2 `crate::module::Resource::method`
/// gives `Resource::method`.
pub(crate) fn type_name_tail(name: &'static str, segments: usize) -> &'static str {
    match segments.checked_sub(1).and_then(|skip| name.rmatch_indices("::").nth(skip)) {
        Some((index, _)) => &name[index + 2..],
        None => name,
    }
}

impl<R> MethodDecl<R> {
    /// Marks the method as serving `GET` requests.
    pub fn get(self) -> Self {
        self.method(Method::GET)
    }

    /// Marks the method with an HTTP method, only `GET` methods are exposed.
    pub fn method(mut self, http_method: Method) -> Self {
        self.http_method = Some(http_method);
        self
    }

    /// Sets the literal path, compared case-insensitively with the request path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Binds the next parameter to query key `key`.
    pub fn query(self, key: impl Into<String>) -> Self {
        self.param(ParamMarker::Query(key.into()))
    }

    /// Marks the next parameter as a path variable.
    pub fn path_param(self, name: impl Into<String>) -> Self {
        self.param(ParamMarker::Path(name.into()))
    }

    /// Leaves the next parameter without any marker.
    pub fn unbound(self) -> Self {
        self.param(ParamMarker::Unbound)
    }

    pub fn param(mut self, marker: ParamMarker) -> Self {
        self.params.push(marker);
        self
    }

    /// Overrides the name shown in diagnostics.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn http_method(&self) -> Option<&Method> {
        self.http_method.as_ref()
    }

    pub fn route_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn params(&self) -> &[ParamMarker] {
        &self.params
    }

    pub fn target_types(&self) -> &[TargetType] {
        &self.target_types
    }

    /// Number of parameters the handler takes.
    #[inline]
    pub fn arity(&self) -> usize {
        self.target_types.len()
    }

    pub(crate) fn erased_call(&self) -> Arc<ErasedCall<R>> {
        Arc::clone(&self.call)
    }
}

impl<R> fmt::Debug for MethodDecl<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl")
            .field("name", &self.name)
            .field("http_method", &self.http_method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("target_types", &self.target_types)
            .finish_non_exhaustive()
    }
}
