//! JSON response envelope shared by every endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{ "data": ..., "error": ... }`; `error` is `null` on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(data: Option<T>, error: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
        }
    }
}

/// Acknowledgement payload for segment writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DoneBody {
    pub done: bool,
}

impl DoneBody {
    pub const DONE: Self = Self { done: true };
    pub const NOT_DONE: Self = Self { done: false };
}
