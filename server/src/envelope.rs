//! Success envelope and JSON body extractor.
//!
//! Every 2xx body is `{"response": ...}`; malformed JSON bodies are rejected
//! with the same `{status, error}` payload as every other failure.

use axum::Json;
use axum::extract::FromRequest;
use serde::Serialize;
use shared::Envelope;

use crate::error::ApiError;

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Wrap a payload in the `{response}` envelope.
pub fn respond<T: Serialize>(value: T) -> Json<Envelope<T>> {
    Json(Envelope::new(value))
}

/// `axum::Json` whose rejection is an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
