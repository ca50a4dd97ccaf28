//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    credibility_scores, enterprises, launch_comments, launches, matches, reviews, startups,
    upvotes, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub user_type: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub avatar_url: Option<&'a str>,
    pub user_type: &'a str,
}

/// Changeset applied when a profile row already exists.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub avatar_url: Option<&'a str>,
    pub user_type: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Startups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = startups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StartupRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub industry: String,
    pub stage: String,
    pub arr_range: Option<String>,
    pub team_size: Option<i32>,
    pub founded_year: Option<i32>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub credibility_score: i16,
    pub total_upvotes: i32,
    pub total_reviews: i32,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Owner-editable startup columns, shared by insert and update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = startups)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct StartupProfileColumns<'a> {
    pub name: &'a str,
    pub tagline: Option<&'a str>,
    pub description: Option<&'a str>,
    pub industry: &'a str,
    pub stage: &'a str,
    pub arr_range: Option<&'a str>,
    pub team_size: Option<i32>,
    pub founded_year: Option<i32>,
    pub headquarters: Option<&'a str>,
    pub website: Option<&'a str>,
    pub logo_url: Option<&'a str>,
    pub technologies: &'a [String],
    pub features: &'a [String],
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = startups)]
pub(crate) struct NewStartupRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[diesel(embed)]
    pub profile: StartupProfileColumns<'a>,
    pub credibility_score: i16,
    pub total_upvotes: i32,
    pub total_reviews: i32,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Enterprises
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enterprises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnterpriseRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub company_name: String,
    pub industry: String,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub preferred_stages: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub budget_range: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = enterprises)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EnterpriseProfileColumns<'a> {
    pub company_name: &'a str,
    pub industry: &'a str,
    pub company_size: Option<&'a str>,
    pub headquarters: Option<&'a str>,
    pub website: Option<&'a str>,
    pub description: Option<&'a str>,
    pub preferred_stages: Vec<String>,
    pub preferred_industries: &'a [String],
    pub budget_range: Option<&'a str>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enterprises)]
pub(crate) struct NewEnterpriseRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[diesel(embed)]
    pub profile: EnterpriseProfileColumns<'a>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Launches, upvotes, comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = launches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LaunchRow {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub product_url: Option<String>,
    pub upvote_count: i32,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = upvotes)]
pub(crate) struct NewUpvoteRow {
    pub launch_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = launch_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub launch_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub author_id: Uuid,
    pub enterprise_id: Option<Uuid>,
    pub rating: i16,
    pub title: String,
    pub content: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Matches and credibility
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MatchRow {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub enterprise_id: Uuid,
    pub match_score: i16,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = credibility_scores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredibilityScoreRow {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub reviews_score: i16,
    pub verification_score: i16,
    pub engagement_score: i16,
    pub longevity_score: i16,
    pub overall_score: i16,
    pub computed_at: DateTime<Utc>,
}
