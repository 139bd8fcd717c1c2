use http::Request;
use micro_rest::coerce::Json;
use micro_rest::resource::{Methods, Resource, method};
use micro_rest::RestContext;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Deserialize, Serialize, Debug, Clone)]
struct Todo {
    title: String,
    done: bool,
}

#[derive(Default)]
struct Todos {
    items: Mutex<Vec<Todo>>,
}

impl Todos {
    fn count(&self) -> Result<usize, String> {
        let items = self.items.lock().map_err(|e| e.to_string())?;
        Ok(items.len())
    }

    fn add(&self, Json(todo): Json<Todo>) -> Result<usize, String> {
        let mut items = self.items.lock().map_err(|e| e.to_string())?;
        items.push(todo);
        Ok(items.len())
    }

    fn find(&self, index: usize) -> Result<Option<Json<Todo>>, String> {
        let items = self.items.lock().map_err(|e| e.to_string())?;
        Ok(items.get(index).cloned().map(Json))
    }
}

impl Resource for Todos {
    fn declare(methods: &mut Methods<Self>) {
        methods
            .add(method(Self::count).get().path("/todos"))
            .add(method(Self::add).get().path("/todos/add").query("todo"))
            .add(method(Self::find).get().path("/todos").query("index"));
    }
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let context = RestContext::builder().resource(Todos::default()).build();

    let uris = [
        "/todos",
        "/todos/add?todo=%7B%22title%22%3A%22write%20docs%22%2C%22done%22%3Afalse%7D",
        "/TODOS",
        "/todos?index=0",
        "/todos?index=7",
        "/todos?index=first",
        "/unknown",
    ];

    for uri in uris {
        let request = Request::get(uri).body(()).expect("uri should be valid");
        match context.handle(&request) {
            Ok(response) => info!(uri, status = %response.status(), body = response.body().as_str(), "served"),
            Err(e) => error!(uri, cause = %e, "request failed"),
        }
    }
}
