//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod history_query;
mod history_repository;
mod membership_command;
mod membership_query;
mod segment_command;
mod segment_repository;

#[cfg(test)]
pub use history_query::MockHistoryQuery;
pub use history_query::{FixtureHistoryQuery, HistoryQuery};
#[cfg(test)]
pub use history_repository::MockHistoryRepository;
pub use history_repository::{
    FixtureHistoryRepository, HistoryRepository, HistoryRepositoryError,
};
#[cfg(test)]
pub use membership_command::MockMembershipCommand;
pub use membership_command::{
    ChangeUserSegmentsRequest, FixtureMembershipCommand, MembershipCommand,
};
#[cfg(test)]
pub use membership_query::MockMembershipQuery;
pub use membership_query::{FixtureMembershipQuery, MembershipQuery};
#[cfg(test)]
pub use segment_command::MockSegmentCommand;
pub use segment_command::{FixtureSegmentCommand, SegmentCommand};
#[cfg(test)]
pub use segment_repository::MockSegmentRepository;
pub use segment_repository::{
    FixtureSegmentRepository, SegmentRepository, SegmentRepositoryError,
};
