//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with fixtures or mocks.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureHistoryQuery, FixtureMembershipCommand, FixtureMembershipQuery, FixtureSegmentCommand,
    HistoryQuery, MembershipCommand, MembershipQuery, SegmentCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub segments: Arc<dyn SegmentCommand>,
    pub membership: Arc<dyn MembershipCommand>,
    pub membership_query: Arc<dyn MembershipQuery>,
    pub history: Arc<dyn HistoryQuery>,
}

impl HttpState {
    /// Build state where one service implements every driving port.
    pub fn from_service<T>(service: Arc<T>) -> Self
    where
        T: SegmentCommand + MembershipCommand + MembershipQuery + HistoryQuery + 'static,
    {
        Self {
            segments: service.clone(),
            membership: service.clone(),
            membership_query: service.clone(),
            history: service,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self {
            segments: Arc::new(FixtureSegmentCommand),
            membership: Arc::new(FixtureMembershipCommand),
            membership_query: Arc::new(FixtureMembershipQuery),
            history: Arc::new(FixtureHistoryQuery),
        }
    }
}
