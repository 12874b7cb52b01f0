//! Segment administration handlers.
//!
//! ```text
//! POST   /api/segments {"slug": "..."}
//! DELETE /api/segments {"slug": "..."}
//! ```

use actix_web::{delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{DoneBody, Envelope};
use crate::inbound::http::state::HttpState;

/// Request body naming one segment.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SlugBody {
    pub slug: String,
}

fn not_done(error: Error) -> Error {
    error.with_details(json!(DoneBody::NOT_DONE))
}

/// Create a segment.
#[utoipa::path(
    post,
    path = "/api/segments",
    request_body = SlugBody,
    responses(
        (status = 200, description = "Segment created", body = Envelope<DoneBody>),
        (status = 400, description = "Invalid slug", body = Envelope<DoneBody>),
        (status = 409, description = "Segment already exists", body = Envelope<DoneBody>),
        (status = 500, description = "Internal error", body = Envelope<DoneBody>)
    ),
    tags = ["segments"],
    operation_id = "createSegment"
)]
#[post("/segments")]
pub async fn create_segment(
    state: web::Data<HttpState>,
    payload: web::Json<SlugBody>,
) -> ApiResult<web::Json<Envelope<DoneBody>>> {
    state
        .segments
        .create_segment(payload.into_inner().slug)
        .await
        .map_err(not_done)?;
    Ok(web::Json(Envelope::success(DoneBody::DONE)))
}

/// Delete a segment and every membership in it.
#[utoipa::path(
    delete,
    path = "/api/segments",
    request_body = SlugBody,
    responses(
        (status = 200, description = "Segment deleted", body = Envelope<DoneBody>),
        (status = 400, description = "Invalid slug", body = Envelope<DoneBody>),
        (status = 404, description = "Segment not found", body = Envelope<DoneBody>),
        (status = 500, description = "Internal error", body = Envelope<DoneBody>)
    ),
    tags = ["segments"],
    operation_id = "deleteSegment"
)]
#[delete("/segments")]
pub async fn delete_segment(
    state: web::Data<HttpState>,
    payload: web::Json<SlugBody>,
) -> ApiResult<web::Json<Envelope<DoneBody>>> {
    state
        .segments
        .delete_segment(payload.into_inner().slug)
        .await
        .map_err(not_done)?;
    Ok(web::Json(Envelope::success(DoneBody::DONE)))
}

#[cfg(test)]
#[path = "segments_tests.rs"]
mod tests;
