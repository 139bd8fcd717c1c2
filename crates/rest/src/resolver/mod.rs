//! Resolution of a request to a single handler descriptor.
//!
//! Every descriptor of the [`Registry`] is run through an AND chain of
//! [`filter`]s: same HTTP method, same path ignoring case, compatible query keys.
//! The survivors decide the outcome:
//! - exactly one: [`Resolution::Matched`]
//! - none: [`Resolution::NotFound`]
//! - more than one: [`Resolution::Ambiguous`]
//!
//! There is no tie-break, an ambiguous request is reported rather than served by
//! an arbitrary handler. Resolving never invokes a handler.

pub mod filter;

use crate::error::ResolveError;
use crate::registry::{HandlerDescriptor, Registry};
use crate::request::RequestContext;
use filter::{AllFilter, Filter};
use tracing::debug;

/// Outcome of resolving one request.
#[derive(Debug)]
pub enum Resolution<'r> {
    Matched(&'r HandlerDescriptor),
    NotFound,
    Ambiguous(Vec<&'r HandlerDescriptor>),
}

impl<'r> Resolution<'r> {
    fn from_candidates(mut candidates: Vec<&'r HandlerDescriptor>) -> Self {
        match candidates.len() {
            0 => Self::NotFound,
            1 => Self::Matched(candidates.swap_remove(0)),
            _ => Self::Ambiguous(candidates),
        }
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// The descriptors that survived filtering.
    pub fn candidates(&self) -> Vec<&'r HandlerDescriptor> {
        match self {
            Self::Matched(descriptor) => vec![*descriptor],
            Self::NotFound => vec![],
            Self::Ambiguous(candidates) => candidates.clone(),
        }
    }

    /// Converts the outcome into the matched descriptor, or the error answered to `req`.
    pub fn into_result(self, req: &RequestContext) -> Result<&'r HandlerDescriptor, ResolveError> {
        match self {
            Self::Matched(descriptor) => Ok(descriptor),
            Self::NotFound => Err(ResolveError::not_found(req.method(), req.path())),
            Self::Ambiguous(candidates) => Err(ResolveError::ambiguous(candidates)),
        }
    }
}

/// Filters registry descriptors down to the one serving a request.
#[derive(Debug)]
pub struct Resolver {
    filters: AllFilter,
}

impl Resolver {
    /// Creates a resolver with the method, path and query filters.
    pub fn new() -> Self {
        let mut filters = filter::all_filter();
        filters.and(filter::method_filter()).and(filter::path_filter()).and(filter::query_filter());
        Self { filters }
    }

    /// Adds a filter every candidate must also pass.
    pub fn with<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filters.and(filter);
        self
    }

    pub fn resolve<'r>(&self, registry: &'r Registry, req: &RequestContext) -> Resolution<'r> {
        let candidates = registry
            .descriptors()
            .iter()
            .filter(|descriptor| self.filters.matches(descriptor, req))
            .collect::<Vec<_>>();

        debug!(
            method = %req.method(),
            path = req.path(),
            query = req.query().len(),
            candidates = candidates.len(),
            "resolve rest request"
        );
        Resolution::from_candidates(candidates)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
