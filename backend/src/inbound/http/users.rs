//! Signed-in user profile handlers.
//!
//! ```text
//! GET /api/v1/users/me
//! PUT /api/v1/users/me {"fullName":"Ada King","avatarUrl":""}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::SessionCache;
use crate::domain::{ProfileUpdate, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile update body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[schema(example = "Ada King")]
    pub full_name: Option<String>,
    /// An empty string clears the avatar.
    pub avatar_url: Option<String>,
}

impl From<ProfileUpdateRequest> for ProfileUpdate {
    fn from(value: ProfileUpdateRequest) -> Self {
        Self {
            full_name: value.full_name,
            avatar_url: value.avatar_url,
        }
    }
}

/// Fetch the signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current profile", body = UserProfileSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "No profile for this account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let user = state.current_user(&session).await?;
    Ok(web::Json(user))
}

/// Update the signed-in user's name or avatar.
///
/// The refreshed profile is written back to the session cookie.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfileSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "No profile for this account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[put("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let user = state.current_user(&session).await?;
    let update = ProfileUpdate::from(payload.into_inner());
    let updated = state.profiles.update(&user, &update).await?;
    if let Err(error) = session.store_profile(&updated) {
        warn!(%error, "failed to cache updated profile");
    }
    Ok(web::Json(updated))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(current_user).service(update_current_user);
}
