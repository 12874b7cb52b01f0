//! Per-slug failures collected while applying a membership change batch.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::domain::SegmentValidationError;

/// Reason a single add or remove statement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangeFailure {
    #[error("{0}")]
    Invalid(SegmentValidationError),
    #[error("segment not found")]
    SegmentNotFound,
    #[error("user is not in this segment")]
    RelationNotFound,
    #[error("relation already exists")]
    RelationAlreadyExists,
    #[error("internal error")]
    Internal,
}

impl From<SegmentValidationError> for ChangeFailure {
    fn from(value: SegmentValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl Serialize for ChangeFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Map from slug to the latest failure recorded for it.
///
/// Removes run before adds, so an add failure replaces a remove failure for
/// the same slug.
///
/// Serialises as a JSON object of slug to human-readable message.
///
/// # Examples
/// ```
/// use user_segmentation::domain::{ChangeErrors, ChangeFailure};
///
/// let mut errors = ChangeErrors::default();
/// errors.record("beta", ChangeFailure::RelationNotFound);
/// errors.record("beta", ChangeFailure::SegmentNotFound);
/// assert_eq!(errors.get("beta"), Some(&ChangeFailure::SegmentNotFound));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeErrors(BTreeMap<String, ChangeFailure>);

impl ChangeErrors {
    /// Record `failure` for `slug`, replacing any earlier failure.
    pub fn record(&mut self, slug: impl Into<String>, failure: ChangeFailure) {
        self.0.insert(slug.into(), failure);
    }

    pub fn get(&self, slug: &str) -> Option<&ChangeFailure> {
        self.0.get(slug)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChangeFailure)> {
        self.0.iter().map(|(slug, failure)| (slug.as_str(), failure))
    }

    /// Slug to message pairs, as exposed to API clients.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(slug, failure)| (slug.clone(), failure.to_string()))
            .collect()
    }
}
