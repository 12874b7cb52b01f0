//! Domain primitives, ports, and services.
//!
//! Purpose: define the strongly typed entities of segment membership and the
//! coordinator that applies batched membership changes. Types are immutable
//! once built and validate their invariants at construction.
//!
//! Public surface:
//! - Segment / SegmentValidationError: validated segment slug.
//! - Operation / OperationKind: append-only ledger entries.
//! - MembershipBatch / BatchOutcome: ordered statements and their results.
//! - ChangeErrors / ChangeFailure: per-slug rejection report.
//! - HistoryPeriod / HistoryReport: monthly ledger slices and their rows.
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - SegmentMembershipService: implementation of every driving port.

pub mod error;
pub mod ports;

mod change_errors;
mod history_period;
mod history_report;
mod membership_batch;
mod membership_service;
mod operation;
mod segment;
mod trace_id;
mod user_id;

pub use self::change_errors::{ChangeErrors, ChangeFailure};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::history_period::{HistoryPeriod, HistoryPeriodError, MAX_YEAR, MIN_YEAR};
pub use self::history_report::{HISTORY_HEADER, HistoryReport};
pub use self::membership_batch::{
    BatchOutcome, MembershipBatch, MembershipStatement, StatementOutcome,
};
pub use self::membership_service::{PartialHistoryPolicy, SegmentMembershipService};
pub use self::operation::{Operation, OperationKind, OperationKindError};
pub use self::segment::{SLUG_MAX_LEN, Segment, SegmentValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_id::UserId;
