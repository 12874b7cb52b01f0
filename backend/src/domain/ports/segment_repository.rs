//! Port for segment definitions and user-segment relations.

use async_trait::async_trait;

use crate::domain::{BatchOutcome, MembershipBatch, Segment, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by segment repository adapters.
    pub enum SegmentRepositoryError {
        /// A segment with the same slug is already stored.
        AlreadyExists { slug: String } => "segment already exists: {slug}",
        /// No segment with the slug is stored.
        NotFound { slug: String } => "segment not found: {slug}",
        /// The user holds no relations.
        NoSegments { user_id: UserId } => "user {user_id} has no segments",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "segment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "segment repository query failed: {message}",
    }
}

/// Port for storing segments and changing user membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SegmentRepository: Send + Sync {
    /// Persist a new segment.
    async fn store(&self, segment: &Segment) -> Result<(), SegmentRepositoryError>;

    /// Delete a segment together with every relation that references it.
    async fn delete(&self, segment: &Segment) -> Result<(), SegmentRepositoryError>;

    /// Apply `batch` for `user_id` in statement order.
    ///
    /// Each statement is committed or rejected on its own; a failing statement
    /// never aborts its siblings. When the batch cannot start at all, every
    /// statement is reported as an internal failure.
    async fn change_user_segments(&self, user_id: UserId, batch: &MembershipBatch)
    -> BatchOutcome;

    /// Segments currently held by `user_id`.
    ///
    /// Returns [`SegmentRepositoryError::NoSegments`] when there are none.
    async fn user_segments(&self, user_id: UserId)
    -> Result<Vec<Segment>, SegmentRepositoryError>;
}

/// Fixture implementation that accepts every write and holds no relations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSegmentRepository;

#[async_trait]
impl SegmentRepository for FixtureSegmentRepository {
    async fn store(&self, _segment: &Segment) -> Result<(), SegmentRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _segment: &Segment) -> Result<(), SegmentRepositoryError> {
        Ok(())
    }

    async fn change_user_segments(
        &self,
        _user_id: UserId,
        batch: &MembershipBatch,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::with_capacity(batch.len());
        for statement in batch.statements() {
            outcome.record(statement.clone(), Ok(()));
        }
        outcome
    }

    async fn user_segments(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Segment>, SegmentRepositoryError> {
        Err(SegmentRepositoryError::no_segments(user_id))
    }
}
