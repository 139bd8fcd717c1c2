//! Query-parameter based dispatch of GET requests to resource methods.
//!
//! Application objects implement [`Resource`](resource::Resource) and list the
//! methods they expose. At startup a [`RestContext`] turns every listed method
//! into a handler descriptor. Each request is then resolved to exactly one
//! descriptor by its method, its path (ignoring case) and its query keys, its
//! query values are coerced into the handler's parameter types, and the
//! handler's result is sent back as plain text.
//!
//! # Example
//!
//! ```
//! use http::{Request, StatusCode};
//! use micro_rest::RestContext;
//! use micro_rest::resource::{method, Methods, Resource};
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     fn hello(&self) -> &'static str {
//!         "hello world"
//!     }
//!
//!     fn greet(&self, name: String, times: Option<usize>) -> String {
//!         format!("hello {name}! ").repeat(times.unwrap_or(1))
//!     }
//! }
//!
//! impl Resource for Greeter {
//!     fn declare(methods: &mut Methods<Self>) {
//!         methods
//!             .add(method(Self::hello).get().path("/hello"))
//!             .add(method(Self::greet).get().path("/hello").query("name").query("times"));
//!     }
//! }
//!
//! let context = RestContext::builder().resource(Greeter).build();
//!
//! let request = Request::get("/HELLO").body(()).unwrap();
//! let response = context.handle(&request).unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body(), "hello world");
//!
//! let request = Request::get("/hello?name=bob&times=2").body(()).unwrap();
//! let response = context.handle(&request).unwrap();
//! assert_eq!(response.body(), "hello bob! hello bob! ");
//! ```
//!
//! The library only emits `tracing` events, installing a subscriber is left to the
//! application.

mod context;
mod dispatch;
mod error;
mod request;

pub mod coerce;
pub mod registry;
pub mod resolver;
pub mod resource;

pub use context::ResponseSink;
pub use context::RestContext;
pub use context::RestContextBuilder;
pub use dispatch::Dispatcher;
pub use error::BoxError;
pub use error::DispatchError;
pub use error::ResolveError;
pub use error::RestError;
pub use registry::Registry;
pub use request::QueryParams;
pub use request::RequestContext;
pub use resolver::Resolution;
pub use resolver::Resolver;
