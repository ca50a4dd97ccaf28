//! Request and response payloads for launch endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Launch, LaunchComment, LaunchDraft, UpvoteToggle};

#[derive(Debug, Deserialize)]
pub(super) struct LaunchPath {
    pub(super) launch_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct StartupLaunchesPath {
    pub(super) startup_id: String,
}

/// Launch form body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[schema(example = "Quantum Ledger 2.0")]
    pub title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    #[schema(example = "https://example.com/launch")]
    pub product_url: Option<String>,
}

impl From<LaunchRequest> for LaunchDraft {
    fn from(value: LaunchRequest) -> Self {
        Self {
            title: value.title,
            tagline: value.tagline,
            description: value.description,
            product_url: value.product_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LaunchResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: String,
    #[schema(value_type = String, format = "uuid")]
    pub startup_id: String,
    pub title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub product_url: Option<String>,
    pub upvote_count: u32,
    pub comment_count: u32,
    pub view_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Launch> for LaunchResponse {
    fn from(value: Launch) -> Self {
        Self {
            id: value.id.to_string(),
            startup_id: value.startup_id.to_string(),
            title: value.content.title,
            tagline: value.content.tagline,
            description: value.content.description,
            product_url: value.content.product_url.map(String::from),
            upvote_count: value.upvote_count,
            comment_count: value.comment_count,
            view_count: value.view_count,
            created_at: value.created_at,
        }
    }
}

/// Outcome of an upvote toggle.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpvoteResponse {
    /// Whether the caller's upvote is present after the toggle.
    pub upvoted: bool,
    pub upvote_count: u32,
}

impl From<UpvoteToggle> for UpvoteResponse {
    fn from(value: UpvoteToggle) -> Self {
        Self {
            upvoted: value.upvoted,
            upvote_count: value.upvote_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[schema(example = "Congrats on the launch!")]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: String,
    #[schema(value_type = String, format = "uuid")]
    pub launch_id: String,
    #[schema(value_type = String, format = "uuid")]
    pub author_id: String,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<LaunchComment> for CommentResponse {
    fn from(value: LaunchComment) -> Self {
        Self {
            id: value.id.to_string(),
            launch_id: value.launch_id.to_string(),
            author_id: value.author_id.to_string(),
            author_name: value.author_name.map(String::from),
            content: value.content.as_ref().to_owned(),
            created_at: value.created_at,
        }
    }
}
