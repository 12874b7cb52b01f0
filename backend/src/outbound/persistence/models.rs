//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! validated domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{operations, segments, user_segments};

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = segments)]
pub(crate) struct NewSegmentRow<'a> {
    pub slug: &'a str,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_segments)]
pub(crate) struct NewUserSegmentRow {
    pub user_id: i64,
    pub segment_id: i64,
}

/// Row struct for reading from the operations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = operations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OperationRow {
    pub user_id: i64,
    pub segment_slug: String,
    pub kind: i16,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = operations)]
pub(crate) struct NewOperationRow<'a> {
    pub user_id: i64,
    pub segment_slug: &'a str,
    pub kind: i16,
    pub recorded_at: DateTime<Utc>,
}
