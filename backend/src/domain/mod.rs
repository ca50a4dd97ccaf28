//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed marketplace entities and the services that
//! operate on them through driven ports. Nothing in this module knows about
//! HTTP, SQL, or the filesystem.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserProfile, AuthSession and friends: identity and session types.
//! - Startup, Enterprise, Launch, Review, Match: marketplace records.
//! - SearchFilters, CredibilityBreakdown, AiFeature: derived views.
//! - SessionSynchronizer: keeps cached and authoritative session state in
//!   step.
//! - `*Service`: use cases invoked by the inbound adapters.

pub mod ai;
mod ai_assistant;
pub mod auth;
pub mod credibility;
mod credibility_service;
pub mod enterprise;
mod enterprise_service;
pub mod error;
pub(crate) mod fields;
pub mod ids;
pub mod launch;
mod launch_service;
pub mod matching;
mod match_service;
pub mod ports;
mod profile_service;
pub mod review;
mod review_service;
pub mod search;
mod search_service;
pub mod session;
pub mod startup;
mod startup_service;
pub mod trace_id;
pub mod user;

pub use self::ai::{AiFeature, AiPayload, AiResponse, AiSource};
pub use self::ai_assistant::AiAssistant;
pub use self::auth::{
    AuthError, AuthEvent, AuthSession, AuthValidationError, PASSWORD_MIN, SignInCredentials,
    SignUpOutcome, SignUpRequest,
};
pub use self::credibility::{
    CredibilityBreakdown, CredibilityInputs, CredibilitySignals, CredibilityTier,
};
pub use self::credibility_service::CredibilityService;
pub use self::enterprise::{BudgetRange, Enterprise, EnterpriseDraft, EnterpriseProfile};
pub use self::enterprise_service::EnterpriseService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::fields::{FieldError, FieldProblem};
pub use self::ids::{CommentId, EnterpriseId, LaunchId, MatchId, ReviewId, StartupId};
pub use self::launch::{
    CommentBody, Launch, LaunchComment, LaunchContent, LaunchDraft, PageRequest, UpvoteToggle,
};
pub use self::launch_service::LaunchService;
pub use self::match_service::MatchService;
pub use self::matching::{Match, MatchScore, MatchStatus};
pub use self::profile_service::{ProfileService, ProfileUpdate};
pub use self::review::{Rating, RatingSummary, Review, ReviewContent, ReviewDraft};
pub use self::review_service::ReviewService;
pub use self::search::{
    SEARCH_LIMIT_DEFAULT, SearchFilterError, SearchFilters, SearchHit, SortKey, StartupOrder,
    StartupQuery,
};
pub use self::search_service::SearchService;
pub use self::session::{HOME_ROUTE, ProfileState, SessionPorts, SessionState, SessionSynchronizer};
pub use self::startup::{ArrRange, FundingStage, Startup, StartupDraft, StartupProfile};
pub use self::startup_service::StartupService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, FullName, UserId, UserProfile, UserType, UserValidationError, parse_avatar_url,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ethaum::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
