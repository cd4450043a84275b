//! Users CRUD endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::UsersConfig;
use crate::http::error::ApiError;
use crate::http::extract::{ValidJson, ValidPath, ValidQuery};
use crate::store::{ListFilter, NewUser, User, UserStore, UserUpdate};
use crate::validation::FieldError;

#[derive(Debug, Clone)]
pub struct UsersState {
    pub store: UserStore,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl UsersState {
    pub fn from_config(config: &UsersConfig) -> Self {
        let store = if config.seed_demo_data {
            UserStore::with_demo_data()
        } else {
            UserStore::new()
        };
        Self::new(store, config)
    }

    pub fn new(store: UserStore, config: &UsersConfig) -> Self {
        Self {
            store,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub active_only: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileParams {
    pub include_stats: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ProfileStats>,
}

#[derive(Debug, Serialize)]
pub struct ProfileStats {
    pub account_age_days: i64,
    pub email_domain: String,
}

impl ProfileStats {
    fn for_user(user: &User) -> Self {
        Self {
            account_age_days: (Utc::now() - user.created_at).num_days(),
            email_domain: user
                .email
                .rsplit_once('@')
                .map(|(_, domain)| domain.to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/users/{id}/profile", get(get_profile))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the users API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<UsersState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "users": state.store.len(),
    }))
}

async fn list_users(
    State(state): State<UsersState>,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Vec<User>>, ApiError> {
    let limit = params.limit.unwrap_or(state.default_page_size);
    if limit == 0 || limit > state.max_page_size {
        return Err(ApiError::Validation(vec![FieldError::query(
            "limit",
            format!("must be between 1 and {}", state.max_page_size),
        )]));
    }

    let filter = ListFilter {
        skip: params.skip.unwrap_or(0),
        limit,
        active_only: params.active_only.unwrap_or(false),
    };
    Ok(Json(state.store.list(filter)))
}

async fn create_user(
    State(state): State<UsersState>,
    ValidJson(new_user): ValidJson<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.store.create(new_user)?;
    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<UsersState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.store.get(id)?))
}

async fn get_profile(
    State(state): State<UsersState>,
    ValidPath(id): ValidPath<u64>,
    ValidQuery(params): ValidQuery<ProfileParams>,
) -> Result<Json<Profile>, ApiError> {
    let user = state.store.get(id)?;
    let stats = params
        .include_stats
        .unwrap_or(false)
        .then(|| ProfileStats::for_user(&user));
    Ok(Json(Profile { user, stats }))
}

async fn update_user(
    State(state): State<UsersState>,
    ValidPath(id): ValidPath<u64>,
    ValidJson(update): ValidJson<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.update(id, update)?;
    tracing::info!(user_id = id, "User updated");
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<UsersState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.delete(id)?;
    tracing::info!(user_id = id, "User deleted");
    Ok(Json(user))
}
