use crate::coerce::TargetType;
use crate::resource::{InvokeError, MethodDecl, Methods, ParamMarker, Resource, type_name_tail};
use http::Method;
use serde_json::Value;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

type BoundCall = dyn Fn(Vec<Value>) -> Result<String, InvokeError> + Send + Sync;

/// The concrete type of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Owner {
    id: TypeId,
    name: &'static str,
}

impl Owner {
    pub fn of<R: 'static>() -> Self {
        Self { id: TypeId::of::<R>(), name: type_name_tail(std::any::type_name::<R>(), 1) }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ties one handler parameter to the query key it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBinding {
    key: String,
    target: TargetType,
}

impl ParamBinding {
    pub fn new(key: impl Into<String>, target: TargetType) -> Self {
        Self { key: key.into(), target }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn target(&self) -> &TargetType {
        &self.target
    }
}

/// An exposed GET handler, bound to the resource instance that owns it.
pub struct HandlerDescriptor {
    owner: Owner,
    name: &'static str,
    method: Method,
    path: String,
    bindings: Vec<ParamBinding>,
    arity: usize,
    call: Arc<BoundCall>,
}

impl HandlerDescriptor {
    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query bindings in parameter declaration order.
    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    /// Declared parameter count, bound or not.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn call(&self, args: Vec<Value>) -> Result<String, InvokeError> {
        (self.call)(args)
    }
}

impl fmt::Display for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}(", self.method, self.path, self.name)?;
        for (index, binding) in self.bindings.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", binding.key, binding.target)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("bindings", &self.bindings)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Builds the descriptors of every exposed method of `resource`.
///
/// A method is exposed when it carries both a path and the `GET` marker. Only
/// parameters marked with a query key get a binding.
pub fn describe<R: Resource>(resource: &Arc<R>) -> Vec<HandlerDescriptor> {
    let mut methods = Methods::new();
    R::declare(&mut methods);

    let owner = Owner::of::<R>();
    methods.into_decls().into_iter().filter_map(|decl| bind(owner, resource, &decl)).collect()
}

fn bind<R: Resource>(owner: Owner, resource: &Arc<R>, decl: &MethodDecl<R>) -> Option<HandlerDescriptor> {
    let path = decl.route_path()?;
    if decl.http_method() != Some(&Method::GET) {
        debug!(handler = decl.name(), method = ?decl.http_method(), "skip non GET rest handler");
        return None;
    }

    if decl.params().len() > decl.arity() {
        warn!(
            handler = decl.name(),
            markers = decl.params().len(),
            arity = decl.arity(),
            "more parameter markers than parameters, extra markers are ignored"
        );
    }

    let bindings = decl
        .params()
        .iter()
        .zip(decl.target_types())
        .filter_map(|(marker, target)| match marker {
            ParamMarker::Query(key) => Some(ParamBinding::new(key.as_str(), target.clone())),
            ParamMarker::Path(_) | ParamMarker::Unbound => None,
        })
        .collect();

    let erased_call = decl.erased_call();
    let instance = Arc::clone(resource);
    let call: Arc<BoundCall> = Arc::new(move |args: Vec<Value>| erased_call(instance.as_ref(), args));

    Some(HandlerDescriptor {
        owner,
        name: decl.name(),
        method: Method::GET,
        path: path.to_owned(),
        bindings,
        arity: decl.arity(),
        call,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::method;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Shelf {
        reads: AtomicUsize,
    }

    impl Shelf {
        fn list(&self) -> usize {
            self.reads.fetch_add(1, Ordering::SeqCst) + 1
        }

        fn find(&self, title: String, _page: u32, limit: Option<u32>) -> String {
            format!("{title}:{}", limit.unwrap_or(10))
        }

        fn by_id(&self, id: u64) -> u64 {
            id
        }
    }

    impl Resource for Shelf {
        fn declare(methods: &mut Methods<Self>) {
            methods
                .add(method(Self::list).get().path("/shelf"))
                .add(method(Self::find).get().path("/shelf/find").query("title").unbound().query("limit"))
                .add(method(Self::by_id).get().path("{id}/shelf").path_param("id"))
                .add(method(Self::list).method(Method::POST).path("/shelf"))
                .add(method(Self::list).get())
                .add(method(Self::list).path("/unmarked"));
        }
    }

    #[test]
    fn test_only_get_methods_with_path_are_exposed() {
        let descriptors = describe(&Arc::new(Shelf::default()));

        let paths = descriptors.iter().map(HandlerDescriptor::path).collect::<Vec<_>>();
        assert_eq!(paths, vec!["/shelf", "/shelf/find", "{id}/shelf"]);
        assert!(descriptors.iter().all(|d| d.method() == Method::GET));
        assert!(descriptors.iter().all(|d| d.owner() == Owner::of::<Shelf>()));
    }

    #[test]
    fn test_bindings_follow_query_markers() {
        let descriptors = describe(&Arc::new(Shelf::default()));

        assert!(descriptors[0].bindings().is_empty());
        assert_eq!(descriptors[0].arity(), 0);

        assert_eq!(
            descriptors[1].bindings(),
            &[
                ParamBinding::new("title", TargetType::Text),
                ParamBinding::new("limit", TargetType::optional(TargetType::UInt)),
            ]
        );
        assert_eq!(descriptors[1].arity(), 3);

        // path variables are never bound
        assert!(descriptors[2].bindings().is_empty());
        assert_eq!(descriptors[2].arity(), 1);
    }

    #[test]
    fn test_call_is_bound_to_instance() {
        let shelf = Arc::new(Shelf::default());
        let descriptors = describe(&shelf);

        assert_eq!(descriptors[0].call(vec![]).unwrap(), "1");
        assert_eq!(descriptors[0].call(vec![]).unwrap(), "2");
        assert_eq!(shelf.reads.load(Ordering::SeqCst), 2);

        assert_eq!(descriptors[1].call(vec![json!("dune"), json!(1), json!(5)]).unwrap(), "dune:5");
    }

    #[test]
    fn test_display() {
        let descriptors = describe(&Arc::new(Shelf::default()));

        assert_eq!(descriptors[0].to_string(), "GET /shelf -> Shelf::list()");
        assert_eq!(
            descriptors[1].to_string(),
            "GET /shelf/find -> Shelf::find(title: text, limit: optional uint)"
        );
    }

    #[test]
    fn test_owner_name() {
        assert_eq!(Owner::of::<Shelf>().name(), "Shelf");
    }
}
