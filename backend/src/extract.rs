//! Request body extractors
//!
//! `JsonBody` behaves like `axum::Json` but rejects through [`ApiError`], so a
//! malformed or incomplete body answers 400 with the usual failure envelope.

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::Validation(e.body_text()))?;
        Ok(JsonBody(value))
    }
}
