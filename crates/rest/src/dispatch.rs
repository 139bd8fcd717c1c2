//! Binding of query values to a resolved handler, and its invocation.

use crate::coerce::{JsonCoercer, ValueCoercer};
use crate::error::DispatchError;
use crate::registry::HandlerDescriptor;
use crate::request::RequestContext;
use crate::resource::InvokeError;
use serde_json::Value;
use std::fmt;
use tracing::{error, trace};

/// Coerces the bound query values of a request and calls the handler with them.
pub struct Dispatcher {
    coercer: Box<dyn ValueCoercer>,
}

impl Dispatcher {
    pub fn new<C: ValueCoercer + 'static>(coercer: C) -> Self {
        Self { coercer: Box::new(coercer) }
    }

    /// Binds, invokes and renders `descriptor` for `req`.
    ///
    /// Bindings are coerced in declaration order, an absent key hands `None` to
    /// the coercer. The first failure aborts the dispatch, the handler is not called.
    pub fn dispatch(&self, descriptor: &HandlerDescriptor, req: &RequestContext) -> Result<String, DispatchError> {
        let result = self.bind(descriptor, req).and_then(|args| Self::invoke(descriptor, args));

        match &result {
            Ok(body) => trace!(handler = descriptor.name(), len = body.len(), "rest handler replied"),
            Err(e) => error!(cause = %e, handler = descriptor.name(), "dispatch rest request error"),
        }
        result
    }

    fn bind(&self, descriptor: &HandlerDescriptor, req: &RequestContext) -> Result<Vec<Value>, DispatchError> {
        descriptor
            .bindings()
            .iter()
            .map(|binding| {
                let raw = req.query().get(binding.key());
                self.coercer
                    .coerce(raw, binding.target())
                    .map_err(|e| DispatchError::coercion(descriptor.name(), binding.key(), e))
            })
            .collect()
    }

    fn invoke(descriptor: &HandlerDescriptor, args: Vec<Value>) -> Result<String, DispatchError> {
        let handler = descriptor.name();
        descriptor.call(args).map_err(|e| match e {
            InvokeError::Arity { expected, actual } => DispatchError::Arity { handler, expected, actual },
            InvokeError::Argument { index, source } => {
                // every parameter is bound once the arity check passed, so index is a binding index
                let key = descriptor.bindings().get(index).map_or_else(|| index.to_string(), |b| b.key().to_owned());
                DispatchError::coercion(handler, key, source)
            }
            InvokeError::Handler(source) => DispatchError::invocation(handler, source),
        })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(JsonCoercer)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
