//! Segment membership service.
//!
//! Implements every driving port over the segment and history repositories.
//! The interesting part is [`MembershipCommand::change_user_segments`]:
//!
//! 1. Every slug is validated on its own; any failure returns the validation
//!    errors without touching a repository.
//! 2. The validated batch (removes first) is applied by the segment
//!    repository, which reports one outcome per statement.
//! 3. Applied statements become ledger entries stamped with the injected
//!    clock, subject to [`PartialHistoryPolicy`].

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde::de::IntoDeserializer;
use serde::de::value::StrDeserializer;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::domain::ports::{
    ChangeUserSegmentsRequest, HistoryQuery, HistoryRepository, HistoryRepositoryError,
    MembershipCommand, MembershipQuery, SegmentCommand, SegmentRepository,
    SegmentRepositoryError,
};
use crate::domain::{
    ChangeErrors, ChangeFailure, Error, HistoryPeriod, HistoryReport, MembershipBatch, Operation,
    Segment, UserId,
};

/// What to record when a batch is only partly applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialHistoryPolicy {
    /// Write no history for a batch with any rejected statement.
    #[default]
    SkipOnFailure,
    /// Write history for the applied statements and still report rejections.
    RecordApplied,
}

impl FromStr for PartialHistoryPolicy {
    type Err = serde::de::value::Error;

    /// Accepts the same snake_case names as configuration files.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let deserializer: StrDeserializer<'_, Self::Err> = value.into_deserializer();
        Self::deserialize(deserializer)
    }
}

fn map_segment_error(error: SegmentRepositoryError) -> Error {
    match error {
        SegmentRepositoryError::AlreadyExists { .. } => Error::conflict("segment already exists"),
        SegmentRepositoryError::NotFound { .. } => Error::not_found("segment not found"),
        SegmentRepositoryError::NoSegments { .. } => Error::not_found("users not found"),
        SegmentRepositoryError::Connection { message } => {
            warn!(%message, "segment repository unavailable");
            Error::service_unavailable("segment repository unavailable")
        }
        SegmentRepositoryError::Query { message } => {
            error!(%message, "segment repository query failed");
            Error::internal(format!("segment repository error: {message}"))
        }
    }
}

fn map_history_error(error: HistoryRepositoryError) -> Error {
    match error {
        HistoryRepositoryError::Connection { message } => {
            warn!(%message, "history repository unavailable");
            Error::service_unavailable("history repository unavailable")
        }
        other => {
            error!(error = %other, "history repository failed");
            Error::internal(format!("history repository error: {other}"))
        }
    }
}

fn validate_slugs(slugs: Vec<String>, errors: &mut ChangeErrors) -> Vec<Segment> {
    let mut valid = Vec::with_capacity(slugs.len());
    for slug in slugs {
        match Segment::new(slug.as_str()) {
            Ok(segment) => valid.push(segment),
            Err(err) => errors.record(slug, ChangeFailure::Invalid(err)),
        }
    }
    valid
}

fn parse_slug(slug: String) -> Result<Segment, Error> {
    Segment::new(slug).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Service implementing segment, membership, and history driving ports.
pub struct SegmentMembershipService<S, H> {
    segments: Arc<S>,
    history: Arc<H>,
    clock: Arc<dyn Clock>,
    policy: PartialHistoryPolicy,
}

impl<S, H> SegmentMembershipService<S, H> {
    /// Create a service using [`PartialHistoryPolicy::SkipOnFailure`].
    pub fn new(segments: Arc<S>, history: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            segments,
            history,
            clock,
            policy: PartialHistoryPolicy::default(),
        }
    }

    /// Replace the partial-history policy.
    pub fn with_policy(mut self, policy: PartialHistoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PartialHistoryPolicy {
        self.policy
    }
}

#[async_trait]
impl<S, H> SegmentCommand for SegmentMembershipService<S, H>
where
    S: SegmentRepository,
    H: HistoryRepository,
{
    async fn create_segment(&self, slug: String) -> Result<(), Error> {
        let segment = parse_slug(slug)?;
        self.segments
            .store(&segment)
            .await
            .map_err(map_segment_error)?;
        debug!(slug = segment.slug(), "segment created");
        Ok(())
    }

    async fn delete_segment(&self, slug: String) -> Result<(), Error> {
        let segment = parse_slug(slug)?;
        self.segments
            .delete(&segment)
            .await
            .map_err(map_segment_error)?;
        debug!(slug = segment.slug(), "segment deleted");
        Ok(())
    }
}

#[async_trait]
impl<S, H> MembershipCommand for SegmentMembershipService<S, H>
where
    S: SegmentRepository,
    H: HistoryRepository,
{
    async fn change_user_segments(
        &self,
        request: ChangeUserSegmentsRequest,
    ) -> Result<ChangeErrors, Error> {
        let ChangeUserSegmentsRequest {
            user_id,
            add,
            remove,
        } = request;

        let mut errors = ChangeErrors::default();
        let to_add = validate_slugs(add, &mut errors);
        let to_remove = validate_slugs(remove, &mut errors);
        if !errors.is_empty() {
            debug!(%user_id, rejected = errors.len(), "membership change failed validation");
            return Ok(errors);
        }

        let batch = MembershipBatch::new(to_add, to_remove);
        let outcome = self.segments.change_user_segments(user_id, &batch).await;
        let mut errors = outcome.errors();

        if !errors.is_empty() && self.policy == PartialHistoryPolicy::SkipOnFailure {
            warn!(
                %user_id,
                rejected = errors.len(),
                applied = outcome.applied().count(),
                "membership batch partly rejected; history not written"
            );
            return Ok(errors);
        }

        let recorded_at = self.clock.utc();
        let operations: Vec<Operation> = outcome
            .applied()
            .map(|statement| {
                Operation::new(
                    user_id,
                    statement.segment().clone(),
                    statement.kind(),
                    recorded_at,
                )
            })
            .collect();

        if !operations.is_empty() {
            match self.history.append(&operations).await {
                Ok(()) => {}
                Err(HistoryRepositoryError::SegmentNotFound { slug }) => {
                    warn!(%user_id, %slug, "segment vanished before history append");
                    errors.record(slug, ChangeFailure::SegmentNotFound);
                }
                Err(err) => {
                    error!(%user_id, error = %err, "history append failed after membership change");
                    return Err(Error::internal(format!("history append failed: {err}")));
                }
            }
        }

        Ok(errors)
    }
}

#[async_trait]
impl<S, H> MembershipQuery for SegmentMembershipService<S, H>
where
    S: SegmentRepository,
    H: HistoryRepository,
{
    async fn user_segments(&self, user_id: UserId) -> Result<Vec<Segment>, Error> {
        match self.segments.user_segments(user_id).await {
            Ok(segments) => Ok(segments),
            Err(SegmentRepositoryError::NoSegments { .. }) => Ok(Vec::new()),
            Err(err) => Err(map_segment_error(err)),
        }
    }
}

#[async_trait]
impl<S, H> HistoryQuery for SegmentMembershipService<S, H>
where
    S: SegmentRepository,
    H: HistoryRepository,
{
    async fn history(&self, year: i32, month: i32) -> Result<HistoryReport, Error> {
        let period = HistoryPeriod::new(year, month)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let operations = self
            .history
            .for_period(period)
            .await
            .map_err(map_history_error)?;
        Ok(HistoryReport::from_operations(&operations))
    }
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
