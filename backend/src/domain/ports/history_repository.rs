//! Port for the append-only membership ledger.

use async_trait::async_trait;

use crate::domain::{HistoryPeriod, Operation};

use super::define_port_error;

define_port_error! {
    /// Errors raised by history repository adapters.
    pub enum HistoryRepositoryError {
        /// An operation references a segment that no longer exists.
        SegmentNotFound { slug: String } => "history references missing segment: {slug}",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "history repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "history repository query failed: {message}",
    }
}

/// Port for appending and reading ledger entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append all `operations` in one write, preserving their order.
    async fn append(&self, operations: &[Operation]) -> Result<(), HistoryRepositoryError>;

    /// Operations recorded inside `period`, in storage order.
    async fn for_period(
        &self,
        period: HistoryPeriod,
    ) -> Result<Vec<Operation>, HistoryRepositoryError>;
}

/// Fixture implementation that discards writes and reads nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHistoryRepository;

#[async_trait]
impl HistoryRepository for FixtureHistoryRepository {
    async fn append(&self, _operations: &[Operation]) -> Result<(), HistoryRepositoryError> {
        Ok(())
    }

    async fn for_period(
        &self,
        _period: HistoryPeriod,
    ) -> Result<Vec<Operation>, HistoryRepositoryError> {
        Ok(Vec::new())
    }
}
