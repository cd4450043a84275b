//! Fruits endpoints, generic over the record variant.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::extract::ValidJson;
use crate::store::{FruitRecord, FruitStore};

/// Response body for both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruits<F> {
    pub fruits: Vec<F>,
}

pub fn router<F: FruitRecord>(store: FruitStore<F>) -> Router {
    Router::new()
        .route("/fruits", get(list_fruits::<F>).post(add_fruit::<F>))
        .with_state(store)
}

async fn list_fruits<F: FruitRecord>(State(store): State<FruitStore<F>>) -> Json<Fruits<F>> {
    Json(Fruits {
        fruits: store.list(),
    })
}

async fn add_fruit<F: FruitRecord>(
    State(store): State<FruitStore<F>>,
    ValidJson(fruit): ValidJson<F>,
) -> Json<Fruits<F>> {
    Json(Fruits {
        fruits: store.add(fruit),
    })
}
