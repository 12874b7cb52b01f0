//! PostgreSQL-backed `SegmentRepository` implementation using Diesel ORM.
//!
//! A membership batch runs inside one transaction. Each statement gets its
//! own savepoint (a nested Diesel transaction), so a rejected statement is
//! rolled back alone while its siblings proceed. Outcomes are recorded in
//! submission order.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};

use crate::domain::ports::{SegmentRepository, SegmentRepositoryError};
use crate::domain::{
    BatchOutcome, ChangeFailure, MembershipBatch, MembershipStatement, OperationKind, Segment,
    UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{NewSegmentRow, NewUserSegmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{segments, user_segments};

/// Diesel-backed implementation of the segment repository port.
#[derive(Clone)]
pub struct DieselSegmentRepository {
    pool: DbPool,
}

impl DieselSegmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_connection_error(error: PoolError) -> SegmentRepositoryError {
    map_pool_error(error, SegmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, slug: &str) -> SegmentRepositoryError {
    match classify_diesel_error(&error) {
        DieselFailure::UniqueViolation => SegmentRepositoryError::already_exists(slug),
        DieselFailure::Connection => {
            SegmentRepositoryError::connection(DieselFailure::Connection.message())
        }
        failure => SegmentRepositoryError::query(failure.message()),
    }
}

/// Failure inside one statement's savepoint.
#[derive(Debug)]
enum StatementError {
    Rejected(ChangeFailure),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for StatementError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl StatementError {
    fn into_failure(self, kind: OperationKind) -> ChangeFailure {
        match self {
            Self::Rejected(failure) => failure,
            Self::Diesel(error) => match (classify_diesel_error(&error), kind) {
                (DieselFailure::UniqueViolation, OperationKind::Add) => {
                    ChangeFailure::RelationAlreadyExists
                }
                (DieselFailure::ForeignKeyViolation, OperationKind::Add) => {
                    ChangeFailure::SegmentNotFound
                }
                _ => ChangeFailure::Internal,
            },
        }
    }
}

async fn remove_relation(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    slug: &str,
) -> Result<(), StatementError> {
    let segment_ids = segments::table
        .filter(segments::slug.eq(slug))
        .select(segments::id);
    let deleted = diesel::delete(
        user_segments::table
            .filter(user_segments::user_id.eq(user_id))
            .filter(user_segments::segment_id.eq_any(segment_ids)),
    )
    .execute(conn)
    .await?;

    if deleted == 0 {
        return Err(StatementError::Rejected(ChangeFailure::RelationNotFound));
    }
    Ok(())
}

async fn add_relation(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    slug: &str,
) -> Result<(), StatementError> {
    let segment_id = segments::table
        .filter(segments::slug.eq(slug))
        .select(segments::id)
        .first::<i64>(conn)
        .await
        .optional()?
        .ok_or(StatementError::Rejected(ChangeFailure::SegmentNotFound))?;

    diesel::insert_into(user_segments::table)
        .values(NewUserSegmentRow {
            user_id,
            segment_id,
        })
        .execute(conn)
        .await?;
    Ok(())
}

async fn apply_statement(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    statement: &MembershipStatement,
) -> Result<(), ChangeFailure> {
    let kind = statement.kind();
    let slug = statement.segment().slug();
    conn.transaction::<_, StatementError, _>(|conn| {
        async move {
            match kind {
                OperationKind::Remove => remove_relation(conn, user_id, slug).await,
                OperationKind::Add => add_relation(conn, user_id, slug).await,
            }
        }
        .scope_boxed()
    })
    .await
    .map_err(|err| {
        let failure = err.into_failure(kind);
        debug!(slug, %kind, %failure, "membership statement rejected");
        failure
    })
}

#[async_trait]
impl SegmentRepository for DieselSegmentRepository {
    async fn store(&self, segment: &Segment) -> Result<(), SegmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        diesel::insert_into(segments::table)
            .values(NewSegmentRow {
                slug: segment.slug(),
            })
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, segment.slug()))?;
        Ok(())
    }

    async fn delete(&self, segment: &Segment) -> Result<(), SegmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        // Relations go with the segment through ON DELETE CASCADE.
        let deleted = diesel::delete(segments::table.filter(segments::slug.eq(segment.slug())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, segment.slug()))?;

        if deleted == 0 {
            return Err(SegmentRepositoryError::not_found(segment.slug()));
        }
        Ok(())
    }

    async fn change_user_segments(
        &self,
        user_id: UserId,
        batch: &MembershipBatch,
    ) -> BatchOutcome {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(%user_id, error = %err, "membership batch could not start");
                return BatchOutcome::all_failed(batch, ChangeFailure::Internal);
            }
        };

        let raw_user_id = user_id.as_i64();
        let result = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let mut outcome = BatchOutcome::with_capacity(batch.len());
                    for statement in batch.statements() {
                        let result = apply_statement(conn, raw_user_id, statement).await;
                        outcome.record(statement.clone(), result);
                    }
                    Ok(outcome)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                let failure = classify_diesel_error(&err);
                warn!(%user_id, failure = failure.message(), "membership batch transaction failed");
                BatchOutcome::all_failed(batch, ChangeFailure::Internal)
            }
        }
    }

    async fn user_segments(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Segment>, SegmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        let slugs: Vec<String> = user_segments::table
            .inner_join(segments::table)
            .filter(user_segments::user_id.eq(user_id.as_i64()))
            .select(segments::slug)
            .order(segments::id.asc())
            .load(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(&err) {
                DieselFailure::Connection => {
                    SegmentRepositoryError::connection(DieselFailure::Connection.message())
                }
                failure => SegmentRepositoryError::query(failure.message()),
            })?;

        if slugs.is_empty() {
            return Err(SegmentRepositoryError::no_segments(user_id));
        }

        slugs
            .into_iter()
            .map(|slug| {
                Segment::new(slug)
                    .map_err(|err| SegmentRepositoryError::query(format!("stored slug: {err}")))
            })
            .collect()
    }
}
