//! Segment entity and slug validation.
//!
//! A [`Segment`] can only be obtained through [`Segment::new`], so every value
//! in memory carries a slug that is non-empty and at most [`SLUG_MAX_LEN`]
//! bytes long. No character set restriction applies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum slug length in bytes, matching the storage column width.
pub const SLUG_MAX_LEN: usize = 255;

/// Validation errors returned by [`Segment::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentValidationError {
    EmptySlug,
    SlugTooLong { max: usize },
}

impl fmt::Display for SegmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySlug => write!(f, "slug cannot be empty"),
            Self::SlugTooLong { max } => write!(f, "slug is too long (max {max} bytes)"),
        }
    }
}

impl std::error::Error for SegmentValidationError {}

/// Named category a user can belong to, identified by its unique slug.
///
/// # Examples
/// ```
/// use user_segmentation::domain::{Segment, SegmentValidationError};
///
/// let segment = Segment::new("AVITO_VOICE_MESSAGES").expect("valid slug");
/// assert_eq!(segment.slug(), "AVITO_VOICE_MESSAGES");
/// assert_eq!(Segment::new(""), Err(SegmentValidationError::EmptySlug));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Segment(String);

impl Segment {
    /// Validate `slug` and construct a segment from it.
    pub fn new(slug: impl Into<String>) -> Result<Self, SegmentValidationError> {
        Self::from_owned(slug.into())
    }

    fn from_owned(slug: String) -> Result<Self, SegmentValidationError> {
        if slug.is_empty() {
            return Err(SegmentValidationError::EmptySlug);
        }
        if slug.len() > SLUG_MAX_LEN {
            return Err(SegmentValidationError::SlugTooLong { max: SLUG_MAX_LEN });
        }
        Ok(Self(slug))
    }

    /// The slug exactly as supplied.
    pub fn slug(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Segment {
    fn as_ref(&self) -> &str {
        self.slug()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl From<Segment> for String {
    fn from(value: Segment) -> Self {
        value.0
    }
}

impl TryFrom<String> for Segment {
    type Error = SegmentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
