//! Monthly history export.
//!
//! ```text
//! GET /api/history/{year}/{month}
//! ```

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, HistoryReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::state::HttpState;

const CSV_CONTENT_TYPE: &str = "text/csv";
const CSV_DISPOSITION: &str = "attachment;filename=history.csv";

/// Serialise `report` as CSV bytes.
pub fn render_csv(report: &HistoryReport) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in report.rows() {
        writer
            .write_record(row)
            .map_err(|err| Error::internal(format!("csv write failed: {err}")))?;
    }
    writer
        .into_inner()
        .map_err(|err| Error::internal(format!("csv flush failed: {err}")))
}

/// Download every membership change recorded in a calendar month (UTC).
#[utoipa::path(
    get,
    path = "/api/history/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Calendar year, 1970 or later"),
        ("month" = i32, Path, description = "Calendar month, 1 to 12")
    ),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid dates", body = Envelope<String>),
        (status = 500, description = "Internal error", body = Envelope<String>)
    ),
    tags = ["history"],
    operation_id = "getHistory"
)]
#[get("/history/{year}/{month}")]
pub async fn get_history(
    state: web::Data<HttpState>,
    path: web::Path<(i32, i32)>,
) -> ApiResult<HttpResponse> {
    let (year, month) = path.into_inner();
    let report = state.history.history(year, month).await?;
    let body = render_csv(&report)?;
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, CSV_CONTENT_TYPE))
        .insert_header((CONTENT_DISPOSITION, CSV_DISPOSITION))
        .body(body))
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
