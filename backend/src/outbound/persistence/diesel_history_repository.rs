//! PostgreSQL-backed `HistoryRepository` implementation using Diesel ORM.
//!
//! Ledger rows keep the slug rather than a foreign key so they outlive segment
//! deletion. `append` still refuses operations naming a segment that no
//! longer exists.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{HistoryRepository, HistoryRepositoryError};
use crate::domain::{HistoryPeriod, Operation, OperationKind, Segment, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{NewOperationRow, OperationRow};
use super::pool::DbPool;
use super::schema::{operations, segments};

/// Diesel-backed implementation of the history repository port.
#[derive(Clone)]
pub struct DieselHistoryRepository {
    pool: DbPool,
}

impl DieselHistoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> HistoryRepositoryError {
    match classify_diesel_error(&error) {
        DieselFailure::Connection => {
            HistoryRepositoryError::connection(DieselFailure::Connection.message())
        }
        failure => HistoryRepositoryError::query(failure.message()),
    }
}

/// Failure while appending inside the transaction.
enum AppendError {
    MissingSegment(String),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for AppendError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn row_to_operation(row: OperationRow) -> Result<Operation, HistoryRepositoryError> {
    let OperationRow {
        user_id,
        segment_slug,
        kind,
        recorded_at,
    } = row;
    let segment = Segment::new(segment_slug)
        .map_err(|err| HistoryRepositoryError::query(format!("stored slug: {err}")))?;
    let kind = OperationKind::try_from(kind)
        .map_err(|err| HistoryRepositoryError::query(err.to_string()))?;
    Ok(Operation::new(
        UserId::new(user_id),
        segment,
        kind,
        recorded_at,
    ))
}

#[async_trait]
impl HistoryRepository for DieselHistoryRepository {
    async fn append(&self, operations: &[Operation]) -> Result<(), HistoryRepositoryError> {
        if operations.is_empty() {
            return Ok(());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, HistoryRepositoryError::connection))?;

        let rows: Vec<NewOperationRow<'_>> = operations
            .iter()
            .map(|op| NewOperationRow {
                user_id: op.user_id().as_i64(),
                segment_slug: op.segment().slug(),
                kind: op.kind().discriminant(),
                recorded_at: op.recorded_at(),
            })
            .collect();
        let referenced: Vec<&str> = rows
            .iter()
            .map(|row| row.segment_slug)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        conn.transaction::<_, AppendError, _>(|conn| {
            async move {
                let existing: BTreeSet<String> = segments::table
                    .filter(segments::slug.eq_any(&referenced))
                    .select(segments::slug)
                    .load::<String>(conn)
                    .await?
                    .into_iter()
                    .collect();
                if let Some(missing) = rows
                    .iter()
                    .find(|row| !existing.contains(row.segment_slug))
                {
                    return Err(AppendError::MissingSegment(missing.segment_slug.to_owned()));
                }

                diesel::insert_into(operations::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            AppendError::MissingSegment(slug) => HistoryRepositoryError::segment_not_found(slug),
            AppendError::Diesel(error) => map_diesel_error(error),
        })
    }

    async fn for_period(
        &self,
        period: HistoryPeriod,
    ) -> Result<Vec<Operation>, HistoryRepositoryError> {
        let (start, end) = period.bounds();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, HistoryRepositoryError::connection))?;

        let rows: Vec<OperationRow> = operations::table
            .filter(operations::recorded_at.ge(start))
            .filter(operations::recorded_at.lt(end))
            .order(operations::id.asc())
            .select(OperationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_operation).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row decoding and error mapping.

    use chrono::{TimeZone, Utc};
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    fn row(kind: i16, slug: &str) -> OperationRow {
        OperationRow {
            user_id: 42,
            segment_slug: slug.to_owned(),
            kind,
            recorded_at: Utc
                .with_ymd_and_hms(2023, 8, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn stored_rows_decode_into_operations() {
        let op = row_to_operation(row(1, "beta")).expect("valid row");
        assert_eq!(op.user_id(), UserId::new(42));
        assert_eq!(op.kind(), OperationKind::Remove);
        assert_eq!(op.segment().slug(), "beta");
    }

    #[rstest]
    #[case(row(7, "beta"))]
    #[case(row(0, ""))]
    fn corrupt_rows_are_query_errors(#[case] stored: OperationRow) {
        let err = row_to_operation(stored).expect_err("corrupt row");
        assert!(matches!(err, HistoryRepositoryError::Query { .. }));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("gone".to_owned()),
        ));
        assert!(matches!(err, HistoryRepositoryError::Connection { .. }));
    }
}
