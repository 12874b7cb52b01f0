//! Driving port for batched membership changes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ChangeErrors, Error, UserId};

/// Request to add and remove segments for one user.
///
/// Slugs are raw strings; each is validated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserSegmentsRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Driving port for membership writes.
///
/// # Examples
///
/// ```rust,no_run
/// # use user_segmentation::domain::UserId;
/// # use user_segmentation::domain::ports::{
/// #     ChangeUserSegmentsRequest, FixtureMembershipCommand, MembershipCommand,
/// # };
/// # async fn example() -> Result<(), user_segmentation::domain::Error> {
/// let request = ChangeUserSegmentsRequest {
///     user_id: UserId::new(1000),
///     add: vec!["AVITO_VOICE_MESSAGES".to_owned()],
///     remove: Vec::new(),
/// };
/// let errors = FixtureMembershipCommand.change_user_segments(request).await?;
/// assert!(errors.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Apply the request; removals are attempted before additions.
    ///
    /// Per-slug rejections are returned as data. `Err` is reserved for
    /// failures that are not attributable to a single slug.
    async fn change_user_segments(
        &self,
        request: ChangeUserSegmentsRequest,
    ) -> Result<ChangeErrors, Error>;
}

/// Fixture command implementation reporting full success.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMembershipCommand;

#[async_trait]
impl MembershipCommand for FixtureMembershipCommand {
    async fn change_user_segments(
        &self,
        _request: ChangeUserSegmentsRequest,
    ) -> Result<ChangeErrors, Error> {
        Ok(ChangeErrors::default())
    }
}
