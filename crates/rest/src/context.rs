//! The transport facing entry point.
//!
//! A [`RestContext`] owns the [`Registry`], the [`Resolver`] and the [`Dispatcher`].
//! It is built once at startup and then serves every request through `&self`:
//!
//! - [`RestContext::serve`] writes the outcome of a request to any [`ResponseSink`]
//! - [`RestContext::handle`] turns an `http::Request` into a ready `http::Response`
//! - [`RestContext::call`] resolves and dispatches without any response at all
//!
//! Requests that don't resolve to exactly one handler are answered with `404`.
//! Coercion and invocation failures are not answered, they are returned to the
//! caller, which decides how to report them.

use crate::coerce::{JsonCoercer, ValueCoercer};
use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, RestError};
use crate::registry::{Registry, RegistryBuilder};
use crate::request::RequestContext;
use crate::resolver::filter::Filter;
use crate::resolver::{Resolution, Resolver};
use crate::resource::Resource;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response, StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Where the outcome of a request is written.
#[cfg_attr(test, mockall::automock)]
pub trait ResponseSink {
    fn send(&mut self, status: StatusCode, body: String);
}

impl ResponseSink for Response<String> {
    fn send(&mut self, status: StatusCode, body: String) {
        *self.status_mut() = status;
        *self.body_mut() = body;
        match mime::TEXT_PLAIN_UTF_8.as_ref().parse::<HeaderValue>() {
            Ok(value) => {
                self.headers_mut().insert(CONTENT_TYPE, value);
            }
            Err(e) => warn!(cause = %e, "can't set rest response content type"),
        }
    }
}

/// Resolves and dispatches GET requests against a fixed set of resources.
#[derive(Debug)]
pub struct RestContext {
    registry: Registry,
    resolver: Resolver,
    dispatcher: Dispatcher,
}

impl RestContext {
    pub fn builder() -> RestContextBuilder {
        RestContextBuilder::new()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolves `req` without invoking anything.
    pub fn resolve<'r>(&'r self, req: &RequestContext) -> Resolution<'r> {
        self.resolver.resolve(&self.registry, req)
    }

    /// Writes the outcome of `req` to `sink`.
    ///
    /// Returns the status that was sent. On a dispatch error nothing is sent.
    pub fn serve<S>(&self, req: &RequestContext, sink: &mut S) -> Result<StatusCode, DispatchError>
    where
        S: ResponseSink + ?Sized,
    {
        let descriptor = match self.resolve(req).into_result(req) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                sink.send(StatusCode::NOT_FOUND, e.to_string());
                return Ok(StatusCode::NOT_FOUND);
            }
        };

        let body = self.dispatcher.dispatch(descriptor, req)?;
        sink.send(StatusCode::OK, body);
        Ok(StatusCode::OK)
    }

    /// Serves an `http::Request`, only its method and uri are read.
    pub fn handle<B>(&self, request: &Request<B>) -> Result<Response<String>, RestError> {
        let req = RequestContext::from_request(request)?;
        let mut response = Response::new(String::new());
        self.serve(&req, &mut response)?;
        Ok(response)
    }

    /// Resolves and dispatches `req`, returning the rendered reply.
    pub fn call(&self, req: &RequestContext) -> Result<String, RestError> {
        let descriptor = self.resolve(req).into_result(req)?;
        Ok(self.dispatcher.dispatch(descriptor, req)?)
    }
}

/// Configures a [`RestContext`].
///
/// # Example
/// ```
/// use micro_rest::RestContext;
/// use micro_rest::coerce::JsonCoercer;
///
/// let context = RestContext::builder().coercer(JsonCoercer).build();
/// assert!(context.registry().is_empty());
/// ```
pub struct RestContextBuilder {
    registry: RegistryBuilder,
    resolver: Resolver,
    coercer: Box<dyn ValueCoercer>,
}

impl RestContextBuilder {
    fn new() -> Self {
        Self { registry: Registry::builder(), resolver: Resolver::new(), coercer: Box::new(JsonCoercer) }
    }

    /// Registers a resource, a later resource of the same type replaces it.
    pub fn resource<R: Resource>(mut self, resource: R) -> Self {
        self.registry = self.registry.resource(resource);
        self
    }

    pub fn shared_resource<R: Resource>(mut self, resource: Arc<R>) -> Self {
        self.registry = self.registry.shared_resource(resource);
        self
    }

    /// Replaces the default [`JsonCoercer`].
    pub fn coercer<C: ValueCoercer + 'static>(mut self, coercer: C) -> Self {
        self.coercer = Box::new(coercer);
        self
    }

    /// Adds a filter every resolved handler must also pass.
    pub fn filter<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.resolver = self.resolver.with(filter);
        self
    }

    pub fn build(self) -> RestContext {
        RestContext {
            registry: self.registry.build(),
            resolver: self.resolver,
            dispatcher: Dispatcher::new(self.coercer),
        }
    }
}

impl fmt::Debug for RestContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestContextBuilder")
            .field("registry", &self.registry)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::{CoercionError, TargetType};
    use crate::request::QueryParams;
    use crate::resolver::filter::fn_filter;
    use crate::resource::{Methods, method};
    use http::Method;
    use mockall::predicate::eq;
    use serde_json::Value;

    struct Echo;

    impl Echo {
        fn ping(&self) -> &'static str {
            "pong"
        }

        fn echo(&self, text: String) -> String {
            text
        }

        fn fail(&self) -> Result<(), std::io::Error> {
            Err(std::io::Error::other("broken"))
        }

        fn pong(&self) -> &'static str {
            "ping"
        }
    }

    impl Resource for Echo {
        fn declare(methods: &mut Methods<Self>) {
            methods
                .add(method(Self::ping).get().path("/ping"))
                .add(method(Self::echo).get().path("/echo").query("text"))
                .add(method(Self::fail).get().path("/fail"))
                .add(method(Self::pong).get().path("/PING"));
        }
    }

    fn context() -> RestContext {
        RestContext::builder().resource(Echo).build()
    }

    fn serve(context: &RestContext, path: &str, query: &str, sink: &mut MockResponseSink) -> Result<StatusCode, DispatchError> {
        let get = Method::GET;
        let req = RequestContext::new(&get, path, QueryParams::parse(query).unwrap());
        context.serve(&req, sink)
    }

    #[test]
    fn test_serve_ok() {
        let mut sink = MockResponseSink::new();
        sink.expect_send().with(eq(StatusCode::OK), eq("hello".to_owned())).times(1).return_const(());

        let status = serve(&context(), "/echo", "text=hello", &mut sink).unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_serve_not_found() {
        let mut sink = MockResponseSink::new();
        sink.expect_send()
            .with(eq(StatusCode::NOT_FOUND), eq("no rest handler for GET /bah, [] found.".to_owned()))
            .times(1)
            .return_const(());

        let status = serve(&context(), "/bah", "", &mut sink).unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_serve_ambiguous() {
        let mut sink = MockResponseSink::new();
        sink.expect_send()
            .withf(|status, body| *status == StatusCode::NOT_FOUND && body.starts_with("ambiguous rest request, ["))
            .times(1)
            .return_const(());

        serve(&context(), "/ping", "", &mut sink).unwrap();
    }

    #[test]
    fn test_serve_errors_send_nothing() {
        let mut sink = MockResponseSink::new();
        sink.expect_send().never();

        let context = context();
        let err = serve(&context, "/fail", "", &mut sink).unwrap_err();
        assert!(matches!(err, DispatchError::Invocation { handler: "Echo::fail", .. }));
    }

    #[test]
    fn test_handle() {
        let context = context();

        let request = Request::get("/echo?text=hello%20world").body(()).unwrap();
        let response = context.handle(&request).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), "hello world");
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");

        let request = Request::get("/nothing").body(()).unwrap();
        let response = context.handle(&request).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::post("/echo?text=hello").body(()).unwrap();
        let response = context.handle(&request).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::get("/fail").body(()).unwrap();
        assert!(matches!(context.handle(&request), Err(RestError::Dispatch { .. })));
    }

    #[test]
    fn test_call() {
        let context = context();
        let get = Method::GET;

        let req = RequestContext::new(&get, "/echo", QueryParams::from_iter([("text", "hi")]));
        assert_eq!(context.call(&req).unwrap(), "hi");

        let req = RequestContext::new(&get, "/ping", QueryParams::empty());
        assert!(matches!(context.call(&req), Err(RestError::Resolve { .. })));
    }

    struct Upper;

    impl ValueCoercer for Upper {
        fn coerce(&self, raw: Option<&str>, target: &TargetType) -> Result<Value, CoercionError> {
            match (raw, target) {
                (Some(raw), TargetType::Text) => Ok(Value::String(raw.to_uppercase())),
                (raw, target) => JsonCoercer.coerce(raw, target),
            }
        }
    }

    #[test]
    fn test_custom_coercer_and_filter() {
        let context = RestContext::builder()
            .resource(Echo)
            .coercer(Upper)
            .filter(fn_filter(|candidate, _req| candidate.name() != "Echo::pong"))
            .build();
        let get = Method::GET;

        let req = RequestContext::new(&get, "/echo", QueryParams::from_iter([("text", "hi")]));
        assert_eq!(context.call(&req).unwrap(), "HI");

        let req = RequestContext::new(&get, "/ping", QueryParams::empty());
        assert_eq!(context.call(&req).unwrap(), "pong");
    }
}
