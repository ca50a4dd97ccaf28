//! Account and session handlers.
//!
//! ```text
//! POST /api/v1/auth/sign-up  {"email":"ada@example.com","password":"hunter22","fullName":"Ada","userType":"startup"}
//! POST /api/v1/auth/sign-in  {"email":"ada@example.com","password":"hunter22","expectedUserType":"startup"}
//! POST /api/v1/auth/sign-out
//! POST /api/v1/auth/refresh
//! GET  /api/v1/session
//! ```
//!
//! Each request drives a short-lived [`crate::domain::SessionSynchronizer`]
//! whose cache is the private session cookie. Provider tokens stay inside
//! the cookie and never appear in response bodies.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{
    Error, ProfileState, SessionState, SignInCredentials, SignUpOutcome, SignUpRequest,
    UserProfile, UserType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_auth_error;
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_auth_validation_error, unknown_value_error};

const FALLBACK_REDIRECT: &str = "/";

/// Sign-up form body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequestBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "hunter22")]
    pub password: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    /// `startup` or `enterprise`.
    #[schema(example = "startup")]
    pub user_type: String,
}

/// Sign-in form body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequestBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "hunter22")]
    pub password: String,
    /// Portal the user signed in from. Accounts of another type are
    /// rejected and signed out again.
    #[schema(example = "startup")]
    pub expected_user_type: Option<String>,
}

/// Public view of the session state.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// `loading`, `authenticated` or `anonymous`.
    #[schema(example = "authenticated")]
    pub state: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<UserProfileSchema>)]
    pub profile: Option<UserProfile>,
    /// `ready`, `not_onboarded` or `unavailable` when authenticated.
    pub profile_status: Option<String>,
}

impl From<&SessionState> for SessionResponse {
    fn from(value: &SessionState) -> Self {
        let state = match value {
            SessionState::Uninitialized | SessionState::Loading { .. } => "loading",
            SessionState::Authenticated { .. } => "authenticated",
            SessionState::Anonymous => "anonymous",
        };
        let profile_status = match value {
            SessionState::Authenticated { profile, .. } => Some(
                match profile {
                    ProfileState::Ready(_) => "ready",
                    ProfileState::NotOnboarded => "not_onboarded",
                    ProfileState::Unavailable => "unavailable",
                }
                .to_owned(),
            ),
            _ => None,
        };
        let session = value.session();
        Self {
            state: state.to_owned(),
            user_id: session.map(|s| s.user_id.to_string()),
            email: session.map(|s| s.email.to_string()),
            expires_at: session.map(|s| s.expires_at),
            profile: value.profile().cloned(),
            profile_status,
        }
    }
}

/// Returned when the provider wants the address confirmed first.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationPendingResponse {
    #[schema(value_type = String, format = "uuid")]
    pub user_id: String,
    pub email: String,
    pub confirmation_required: bool,
}

fn parse_expected_type(raw: Option<&str>) -> Result<Option<UserType>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<UserType>().map(Some).map_err(|_| {
        unknown_value_error(
            FieldName::new("expectedUserType"),
            raw,
            &[
                UserType::Startup.as_str(),
                UserType::Enterprise.as_str(),
                UserType::Admin.as_str(),
            ],
        )
    })
}

/// Register an account and its profile row.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = SignUpRequestBody,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionResponse),
        (status = 202, description = "Email confirmation required", body = ConfirmationPendingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Already registered", body = ErrorSchema),
        (status = 429, description = "Rate limited", body = ErrorSchema),
        (status = 503, description = "Identity provider unreachable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/sign-up")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignUpRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = SignUpRequest::try_from_parts(
        &body.email,
        &body.password,
        &body.full_name,
        &body.user_type,
    )
    .map_err(map_auth_validation_error)?;
    let (sync, _) = state.synchronizer(session);
    match sync.sign_up(&request).await.map_err(map_auth_error)? {
        SignUpOutcome::SignedIn(_) => {
            Ok(HttpResponse::Created().json(SessionResponse::from(&sync.state())))
        }
        SignUpOutcome::ConfirmationRequired { user_id, email } => {
            Ok(HttpResponse::Accepted().json(ConfirmationPendingResponse {
                user_id: user_id.to_string(),
                email: email.to_string(),
                confirmation_required: true,
            }))
        }
    }
}

/// Authenticate and load the caller's profile.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = SignInRequestBody,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Unconfirmed email or wrong portal", body = ErrorSchema),
        (status = 429, description = "Rate limited", body = ErrorSchema),
        (status = 503, description = "Identity provider unreachable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequestBody>,
) -> ApiResult<web::Json<SessionResponse>> {
    let body = payload.into_inner();
    let credentials = SignInCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_auth_validation_error)?;
    let expected = parse_expected_type(body.expected_user_type.as_deref())?;
    let (sync, _) = state.synchronizer(session);
    let signed_in = sync
        .sign_in(&credentials, expected)
        .await
        .map_err(map_auth_error)?;
    Ok(web::Json(SessionResponse::from(&signed_in)))
}

/// Clear the session cookie, revoke the provider session and redirect home.
///
/// Always answers `303`; a provider failure is only logged.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses((status = 303, description = "Signed out; redirect home")),
    tags = ["auth"],
    operation_id = "signOut",
    security([])
)]
#[post("/auth/sign-out")]
pub async fn sign_out(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let (sync, navigator) = state.synchronizer(session);
    if let Err(error) = sync.sign_out().await {
        warn!(%error, "provider sign-out failed");
    }
    let location = navigator
        .last()
        .unwrap_or_else(|| FALLBACK_REDIRECT.to_owned());
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Exchange the stored refresh token for a new session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    responses(
        (status = 200, description = "Session refreshed", body = SessionResponse),
        (status = 401, description = "Not signed in or refresh rejected", body = ErrorSchema),
        (status = 503, description = "Identity provider unreachable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "refreshSession"
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionResponse>> {
    let (sync, _) = state.synchronizer(session);
    sync.initialize().await;
    sync.refresh_session()
        .await
        .map_err(map_auth_error)?
        .ok_or_else(|| Error::unauthorized("login required"))?;
    Ok(web::Json(SessionResponse::from(&sync.state())))
}

/// Reconcile the cookie with the provider and report who is signed in.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses((status = 200, description = "Current session", body = SessionResponse)),
    tags = ["auth"],
    operation_id = "currentSession",
    security([])
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> web::Json<SessionResponse> {
    let (sync, _) = state.synchronizer(session);
    sync.initialize().await;
    web::Json(SessionResponse::from(&sync.state()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sign_up)
        .service(sign_in)
        .service(sign_out)
        .service(refresh)
        .service(current_session);
}
