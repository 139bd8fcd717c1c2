//! Candidate filtering module that provides composable descriptor filters.
//!
//! This module implements the filters the resolver applies to every registered
//! handler descriptor:
//! - Filter descriptors based on the request's HTTP method
//! - Filter descriptors based on the request path, ignoring case
//! - Filter descriptors based on the query keys of the request
//! - Combine filters using AND logic
//! - Create custom filters using closures
//!
//! ## Thread Safety
//!
//! All filters must implement the `Filter` trait, which requires `Send + Sync`,
//! so a resolver can be shared by all request threads.
//!
//! # Examples
//!
//! ```
//! use micro_rest::resolver::filter::{all_filter, method_filter, path_filter, query_filter};
//!
//! let mut filters = all_filter();
//! filters.and(method_filter()).and(path_filter()).and(query_filter());
//! ```

use crate::registry::HandlerDescriptor;
use crate::request::RequestContext;

/// Core trait for candidate filtering.
///
/// Returns `true` if `candidate` may serve `req`.
pub trait Filter: Send + Sync {
    fn matches(&self, candidate: &HandlerDescriptor, req: &RequestContext) -> bool;
}

/// A filter that wraps a closure.
struct FnFilter<F: Fn(&HandlerDescriptor, &RequestContext) -> bool>(F);

impl<F: Fn(&HandlerDescriptor, &RequestContext) -> bool + Send + Sync> Filter for FnFilter<F> {
    fn matches(&self, candidate: &HandlerDescriptor, req: &RequestContext) -> bool {
        (self.0)(candidate, req)
    }
}

/// Creates a new filter from a closure.
///
/// # Example
/// ```
/// use micro_rest::resolver::filter::fn_filter;
///
/// let no_admin = fn_filter(|candidate, _req| !candidate.path().starts_with("/admin"));
/// ```
pub fn fn_filter<F>(f: F) -> impl Filter
where
    F: Fn(&HandlerDescriptor, &RequestContext) -> bool + Send + Sync,
{
    FnFilter(f)
}

/// Creates a new AND-composed filter chain.
pub fn all_filter() -> AllFilter {
    AllFilter::new()
}

/// Compose filters with AND logic.
///
/// All inner filters must succeed for the whole filter to succeed.
/// An empty filter chain returns true by default.
pub struct AllFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AllFilter {
    fn new() -> Self {
        Self { filters: vec![] }
    }

    /// Add a new filter to the AND chain.
    pub fn and<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Filter for AllFilter {
    fn matches(&self, candidate: &HandlerDescriptor, req: &RequestContext) -> bool {
        self.filters.iter().all(|filter| filter.matches(candidate, req))
    }
}

impl std::fmt::Debug for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllFilter").field("filters", &self.filters.len()).finish()
    }
}

/// A filter that matches the request method against the descriptor's method.
#[derive(Debug, Clone, Copy)]
pub struct MethodFilter;

impl Filter for MethodFilter {
    #[inline]
    fn matches(&self, candidate: &HandlerDescriptor, req: &RequestContext) -> bool {
        candidate.method() == req.method()
    }
}

#[inline]
pub fn method_filter() -> MethodFilter {
    MethodFilter
}

/// A filter that compares the literal descriptor path with the request path, ignoring case.
///
/// Case is folded over the whole of Unicode, so `/café` matches `/CAFÉ`. No segment is
/// matched against a template: `{id}/foo` only matches a request for `{id}/foo`.
#[derive(Debug, Clone, Copy)]
pub struct PathFilter;

impl Filter for PathFilter {
    #[inline]
    fn matches(&self, candidate: &HandlerDescriptor, req: &RequestContext) -> bool {
        eq_ignore_case(candidate.path(), req.path())
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

#[inline]
pub fn path_filter() -> PathFilter {
    PathFilter
}

/// A filter on the query keys of the request.
///
/// - a request without query parameters only matches descriptors without bindings
/// - otherwise a descriptor matches when it has no more bindings than the request has
///   parameters, and at least one of its keys is present in the request
///
/// The second rule does not require every bound key to be present: a descriptor
/// bound to `a` and `b` matches `?a=1&c=2`, and the missing `b` is left to the coercer.
#[derive(Debug, Clone, Copy)]
pub struct QueryFilter;

impl Filter for QueryFilter {
    fn matches(&self, candidate: &HandlerDescriptor, req: &RequestContext) -> bool {
        let query = req.query();
        let bindings = candidate.bindings();

        if query.is_empty() {
            return bindings.is_empty();
        }

        bindings.len() <= query.len() && bindings.iter().any(|binding| query.contains_key(binding.key()))
    }
}

#[inline]
pub fn query_filter() -> QueryFilter {
    QueryFilter
}
