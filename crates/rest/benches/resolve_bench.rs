use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use http::{Method, Request};
use micro_rest::resource::{Methods, Resource, method};
use micro_rest::{QueryParams, RequestContext, RestContext};
use std::hint::black_box;

struct Catalog;

impl Catalog {
    fn items(&self) -> &'static str {
        "items"
    }

    fn item(&self, id: u64) -> u64 {
        id
    }

    fn page(&self, page: u32, size: Option<u32>) -> String {
        format!("{page}/{}", size.unwrap_or(20))
    }

    fn search(&self, text: String, exact: Option<bool>) -> String {
        format!("{text}:{}", exact.unwrap_or_default())
    }

    fn health(&self) -> bool {
        true
    }
}

impl Resource for Catalog {
    fn declare(methods: &mut Methods<Self>) {
        methods
            .add(method(Self::items).get().path("/items"))
            .add(method(Self::item).get().path("/items").query("id"))
            .add(method(Self::page).get().path("/items").query("page").query("size"))
            .add(method(Self::search).get().path("/search").query("text").query("exact"))
            .add(method(Self::health).get().path("/health"));
    }
}

static CASES: &[(&str, &str, &str)] = &[
    ("no_query", "/items", ""),
    ("single_key", "/items", "id=42"),
    ("two_keys", "/items", "page=3&size=50"),
    ("text", "/search", "text=hello%20world&exact=true"),
    ("not_found", "/nothing", "id=1"),
];

fn benchmark_resolve(criterion: &mut Criterion) {
    let context = RestContext::builder().resource(Catalog).build();
    let mut group = criterion.benchmark_group("resolve");

    for (name, path, query) in CASES {
        let method = Method::GET;
        let req = RequestContext::new(&method, *path, QueryParams::parse(query).expect("query should be valid"));
        group.bench_with_input(BenchmarkId::from_parameter(name), &req, |b, req| {
            b.iter(|| black_box(context.resolve(black_box(req)).is_matched()));
        });
    }

    group.finish();
}

fn benchmark_handle(criterion: &mut Criterion) {
    let context = RestContext::builder().resource(Catalog).build();
    let mut group = criterion.benchmark_group("handle");

    for (name, path, query) in CASES {
        let uri = if query.is_empty() { (*path).to_owned() } else { format!("{path}?{query}") };
        let request = Request::get(uri).body(()).expect("request should be valid");
        group.bench_with_input(BenchmarkId::from_parameter(name), &request, |b, request| {
            b.iter(|| black_box(context.handle(black_box(request)).expect("request should be served")));
        });
    }

    group.finish();
}

criterion_group!(resolve, benchmark_resolve, benchmark_handle);
criterion_main!(resolve);
