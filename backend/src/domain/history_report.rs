//! Tabular rendering of ledger entries for export.

use chrono::SecondsFormat;

use crate::domain::Operation;

/// Column headings of the history export, in order.
pub const HISTORY_HEADER: [&str; 4] = ["User ID", "Segment", "Operation", "Timestamp UTC"];

/// Rows ready for CSV serialisation, header first.
///
/// Timestamps are RFC 3339 in UTC with microsecond precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryReport {
    rows: Vec<[String; 4]>,
}

impl HistoryReport {
    pub fn from_operations(operations: &[Operation]) -> Self {
        let header = HISTORY_HEADER.map(str::to_owned);
        let rows = std::iter::once(header)
            .chain(operations.iter().map(|op| {
                [
                    op.user_id().to_string(),
                    op.segment().slug().to_owned(),
                    op.kind().as_str().to_owned(),
                    op.recorded_at()
                        .to_rfc3339_opts(SecondsFormat::Micros, true),
                ]
            }))
            .collect();
        Self { rows }
    }

    /// All rows including the header.
    pub fn rows(&self) -> &[[String; 4]] {
        &self.rows
    }

    /// Number of operations, excluding the header.
    pub fn operation_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}
