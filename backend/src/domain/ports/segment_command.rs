//! Driving port for segment administration.

use async_trait::async_trait;

use crate::domain::Error;

/// Driving port for creating and deleting segments.
///
/// Slugs arrive unvalidated; implementations validate them and return
/// `ErrorCode::InvalidRequest` for malformed input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SegmentCommand: Send + Sync {
    /// Create the segment named `slug`.
    async fn create_segment(&self, slug: String) -> Result<(), Error>;

    /// Delete the segment named `slug` and every membership in it.
    async fn delete_segment(&self, slug: String) -> Result<(), Error>;
}

/// Fixture command implementation that accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSegmentCommand;

#[async_trait]
impl SegmentCommand for FixtureSegmentCommand {
    async fn create_segment(&self, _slug: String) -> Result<(), Error> {
        Ok(())
    }

    async fn delete_segment(&self, _slug: String) -> Result<(), Error> {
        Ok(())
    }
}
