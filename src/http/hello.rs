//! Hello-world endpoints and static files.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::config::HelloConfig;

#[derive(Debug, Clone)]
pub struct HelloState {
    greeting: Arc<str>,
}

pub fn router(config: &HelloConfig) -> Router {
    let state = HelloState {
        greeting: Arc::from(config.greeting.as_str()),
    };

    Router::new()
        .route("/", get(root))
        .route("/api/hello", get(hello))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

async fn hello(State(state): State<HelloState>) -> Json<Value> {
    Json(json!({ "message": &*state.greeting }))
}
