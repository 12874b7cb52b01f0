//! Immutable membership ledger entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Segment, UserId};

/// Kind of membership change an [`Operation`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Remove,
}

/// Raised when a stored or supplied discriminant is neither add nor remove.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("incorrect operation type: {value}")]
pub struct OperationKindError {
    value: String,
}

impl OperationKind {
    /// Literal used in history exports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    /// Storage discriminant.
    pub const fn discriminant(self) -> i16 {
        match self {
            Self::Add => 0,
            Self::Remove => 1,
        }
    }
}

impl TryFrom<i16> for OperationKind {
    type Error = OperationKindError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Add),
            1 => Ok(Self::Remove),
            other => Err(OperationKindError {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for OperationKind {
    type Err = OperationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(OperationKindError {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted membership change.
///
/// ## Invariants
/// - Never mutated after construction; the ledger is append-only.
/// - `recorded_at` is UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    user_id: UserId,
    segment: Segment,
    kind: OperationKind,
    recorded_at: DateTime<Utc>,
}

impl Operation {
    /// Record a change for `user_id` at `recorded_at`.
    pub fn new(
        user_id: UserId,
        segment: Segment,
        kind: OperationKind,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            segment,
            kind,
            recorded_at,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
