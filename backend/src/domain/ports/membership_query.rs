//! Driving port for reading current membership.

use async_trait::async_trait;

use crate::domain::{Error, Segment, UserId};

/// Driving port for membership reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipQuery: Send + Sync {
    /// Segments `user_id` currently belongs to; empty when none.
    async fn user_segments(&self, user_id: UserId) -> Result<Vec<Segment>, Error>;
}

/// Fixture query implementation with no memberships.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMembershipQuery;

#[async_trait]
impl MembershipQuery for FixtureMembershipQuery {
    async fn user_segments(&self, _user_id: UserId) -> Result<Vec<Segment>, Error> {
        Ok(Vec::new())
    }
}
