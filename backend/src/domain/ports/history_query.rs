//! Driving port for monthly history exports.

use async_trait::async_trait;

use crate::domain::{Error, HistoryReport};

/// Driving port for ledger reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryQuery: Send + Sync {
    /// Render every operation recorded in `year`-`month` (UTC).
    ///
    /// Out-of-range dates yield `ErrorCode::InvalidRequest` with the message
    /// `"invalid dates"`.
    async fn history(&self, year: i32, month: i32) -> Result<HistoryReport, Error>;
}

/// Fixture query implementation returning an empty report.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHistoryQuery;

#[async_trait]
impl HistoryQuery for FixtureHistoryQuery {
    async fn history(&self, _year: i32, _month: i32) -> Result<HistoryReport, Error> {
        Ok(HistoryReport::from_operations(&[]))
    }
}
