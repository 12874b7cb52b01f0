//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer and the
//! request and response bodies they exchange. The generated document backs
//! Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::envelope::{DoneBody, Envelope};
use crate::inbound::http::segments::SlugBody;
use crate::inbound::http::users::{ChangeResultBody, ChangeSegmentsBody, SegmentBody};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User segmentation API",
        description = "Segment administration, user membership changes and the monthly membership history export."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::segments::create_segment,
        crate::inbound::http::segments::delete_segment,
        crate::inbound::http::users::get_user_segments,
        crate::inbound::http::users::change_user_segments,
        crate::inbound::http::history::get_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SlugBody,
        DoneBody,
        SegmentBody,
        ChangeSegmentsBody,
        ChangeResultBody,
        Envelope<DoneBody>,
        Envelope<ChangeResultBody>,
    )),
    tags(
        (name = "segments", description = "Create and delete segments"),
        (name = "users", description = "Read and change a user's segments"),
        (name = "history", description = "Membership change history export"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
