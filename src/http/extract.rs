//! Extractors that turn client input problems into a 422 [`ApiError`].
//!
//! A body that cannot be read keeps its own status (413 when over the limit).

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::http::error::ApiError;
use crate::validation::{FieldError, Validate};

/// JSON body that deserialized and passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| match e {
                JsonRejection::BytesRejection(e) => ApiError::Body(e.status(), e.body_text()),
                e => ApiError::Validation(vec![FieldError::new(&["body"], e.body_text())]),
            })?;

        let errors = value.validate();
        if errors.is_empty() {
            Ok(Self(value))
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Query string parameters; type errors are reported as 422.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                ApiError::Validation(vec![FieldError::new(&["query"], e.body_text())])
            })?;
        Ok(Self(value))
    }
}

/// Path parameters; type errors are reported as 422.
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                ApiError::Validation(vec![FieldError::new(&["path"], e.body_text())])
            })?;
        Ok(Self(value))
    }
}
