//! Product launches, upvotes, and comments.

use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::fields::{FieldError, optional_text, optional_url, required_text};
use crate::domain::startup::{DESCRIPTION_MAX, TAGLINE_MAX};
use crate::domain::{CommentId, FullName, LaunchId, StartupId, UserId};

pub const TITLE_MAX: usize = 120;
pub const COMMENT_MAX: usize = 2000;
pub const PAGE_LIMIT_DEFAULT: u32 = 20;
pub const PAGE_LIMIT_MAX: u32 = 50;

/// Raw launch form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchDraft {
    pub title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub product_url: Option<String>,
}

/// Validated launch copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContent {
    pub title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub product_url: Option<Url>,
}

impl TryFrom<&LaunchDraft> for LaunchContent {
    type Error = FieldError;

    fn try_from(draft: &LaunchDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required_text("title", &draft.title, 1, TITLE_MAX)?,
            tagline: optional_text("tagline", draft.tagline.as_deref(), TAGLINE_MAX)?,
            description: optional_text("description", draft.description.as_deref(), DESCRIPTION_MAX)?,
            product_url: optional_url("productUrl", draft.product_url.as_deref())?,
        })
    }
}

/// Persisted launch and its interaction counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub id: LaunchId,
    pub startup_id: StartupId,
    pub content: LaunchContent,
    pub upvote_count: u32,
    pub comment_count: u32,
    pub view_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Outcome of toggling an upvote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpvoteToggle {
    /// Whether the caller's upvote is present after the toggle.
    pub upvoted: bool,
    pub upvote_count: u32,
}

/// Validated comment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(raw: &str) -> Result<Self, FieldError> {
        required_text("content", raw, 1, COMMENT_MAX).map(Self)
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A comment with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchComment {
    pub id: CommentId,
    pub launch_id: LaunchId,
    pub author_id: UserId,
    pub author_name: Option<FullName>,
    pub content: CommentBody,
    pub created_at: DateTime<Utc>,
}

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    /// Clamp caller-supplied paging values into the supported window.
    ///
    /// # Examples
    /// ```
    /// use ethaum::domain::PageRequest;
    ///
    /// let page = PageRequest::new(Some(500), None);
    /// assert_eq!(page.limit, 50);
    /// assert_eq!(page.offset, 0);
    /// ```
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(PAGE_LIMIT_DEFAULT).clamp(1, PAGE_LIMIT_MAX),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, PAGE_LIMIT_DEFAULT)]
    #[case(Some(0), 1)]
    #[case(Some(10), 10)]
    #[case(Some(999), PAGE_LIMIT_MAX)]
    fn page_limits_are_clamped(#[case] limit: Option<u32>, #[case] expected: u32) {
        assert_eq!(PageRequest::new(limit, Some(5)).limit, expected);
    }

    #[rstest]
    fn launch_title_is_required() {
        let err = LaunchContent::try_from(&LaunchDraft::default()).expect_err("missing title");
        assert_eq!(err.field, "title");
    }

    #[rstest]
    fn comments_are_bounded() {
        assert!(CommentBody::new("Congrats on the launch!").is_ok());
        assert!(CommentBody::new("   ").is_err());
        assert!(CommentBody::new(&"x".repeat(COMMENT_MAX + 1)).is_err());
    }
}
