//! Membership handlers.
//!
//! ```text
//! GET  /api/users/{user_id}
//! POST /api/users/{user_id} {"add": [...], "remove": [...]}
//! ```

use std::collections::BTreeMap;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::ChangeUserSegmentsRequest;
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::state::HttpState;

/// Message returned when any requested change was rejected.
pub const CHANGING_ERROR_MESSAGE: &str = "changing error";

/// Segment as listed for a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SegmentBody {
    pub slug: String,
}

/// Requested membership changes; absent lists are empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ChangeSegmentsBody {
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Outcome of a membership change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ChangeResultBody {
    pub done: bool,
    /// Slug to reason for each rejected change; `null` when all succeeded.
    pub errors: Option<BTreeMap<String, String>>,
}

/// List the segments a user belongs to.
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Current segments", body = Envelope<Vec<SegmentBody>>),
        (status = 400, description = "Invalid user id", body = Envelope<Vec<SegmentBody>>),
        (status = 500, description = "Internal error", body = Envelope<Vec<SegmentBody>>)
    ),
    tags = ["users"],
    operation_id = "getUserSegments"
)]
#[get("/users/{user_id}")]
pub async fn get_user_segments(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Envelope<Vec<SegmentBody>>>> {
    let user_id = UserId::new(path.into_inner());
    let segments = state.membership_query.user_segments(user_id).await?;
    let body = segments
        .into_iter()
        .map(|segment| SegmentBody {
            slug: String::from(segment),
        })
        .collect();
    Ok(web::Json(Envelope::success(body)))
}

/// Add and remove segments for a user; removals run first.
#[utoipa::path(
    post,
    path = "/api/users/{user_id}",
    params(("user_id" = i64, Path, description = "User identifier")),
    request_body = ChangeSegmentsBody,
    responses(
        (status = 200, description = "All changes applied", body = Envelope<ChangeResultBody>),
        (status = 400, description = "Some changes rejected", body = Envelope<ChangeResultBody>),
        (status = 500, description = "Internal error", body = Envelope<ChangeResultBody>)
    ),
    tags = ["users"],
    operation_id = "changeUserSegments"
)]
#[post("/users/{user_id}")]
pub async fn change_user_segments(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<ChangeSegmentsBody>,
) -> ApiResult<web::Json<Envelope<ChangeResultBody>>> {
    let ChangeSegmentsBody { add, remove } = payload.into_inner();
    let request = ChangeUserSegmentsRequest {
        user_id: UserId::new(path.into_inner()),
        add,
        remove,
    };

    let errors = state.membership.change_user_segments(request).await?;
    if !errors.is_empty() {
        let body = ChangeResultBody {
            done: false,
            errors: Some(errors.messages()),
        };
        return Err(Error::invalid_request(CHANGING_ERROR_MESSAGE).with_details(json!(body)));
    }

    Ok(web::Json(Envelope::success(ChangeResultBody {
        done: true,
        errors: None,
    })))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
