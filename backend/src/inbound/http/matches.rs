//! Startup/enterprise match handlers.
//!
//! ```text
//! GET /api/v1/matches
//! PUT /api/v1/matches/{matchId}/status {"status":"interested"}
//! ```

use actix_web::{get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Match, MatchId, MatchStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, unknown_value_error};

#[derive(Debug, Deserialize)]
struct MatchPath {
    match_id: String,
}

/// Status change body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatusRequest {
    /// One of `pending`, `interested`, `connected`, `declined`.
    #[schema(example = "interested")]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: String,
    #[schema(value_type = String, format = "uuid")]
    pub startup_id: String,
    #[schema(value_type = String, format = "uuid")]
    pub enterprise_id: String,
    #[schema(example = 82)]
    pub match_score: u8,
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Match> for MatchResponse {
    fn from(value: Match) -> Self {
        Self {
            id: value.id.to_string(),
            startup_id: value.startup_id.to_string(),
            enterprise_id: value.enterprise_id.to_string(),
            match_score: value.match_score.value(),
            status: value.status.as_str().to_owned(),
            created_at: value.created_at,
        }
    }
}

fn parse_status(raw: &str) -> Result<MatchStatus, Error> {
    raw.trim().parse::<MatchStatus>().map_err(|value| {
        let expected = MatchStatus::ALL.map(MatchStatus::as_str);
        unknown_value_error(FieldName::new("status"), &value, &expected)
    })
}

/// Matches involving the caller's startup or enterprise.
#[utoipa::path(
    get,
    path = "/api/v1/matches",
    responses(
        (status = 200, description = "Matches", body = [MatchResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listMatches"
)]
#[get("/matches")]
pub async fn list_matches(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let user = state.current_user(&session).await?;
    let matches = state.matches.list(&user).await?;
    Ok(web::Json(matches.into_iter().map(Into::into).collect()))
}

/// Overwrite a match status.
#[utoipa::path(
    put,
    path = "/api/v1/matches/{matchId}/status",
    params(("matchId" = String, Path, description = "Match identifier")),
    request_body = MatchStatusRequest,
    responses(
        (status = 200, description = "Updated match", body = MatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "setMatchStatus"
)]
#[put("/matches/{match_id}/status")]
pub async fn set_match_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<MatchPath>,
    payload: web::Json<MatchStatusRequest>,
) -> ApiResult<web::Json<MatchResponse>> {
    let id: MatchId = parse_id(&path.match_id, FieldName::new("matchId"))?;
    let status = parse_status(&payload.status)?;
    let user = state.current_user(&session).await?;
    let updated = state.matches.set_status(&user, &id, status).await?;
    Ok(web::Json(updated.into()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_matches).service(set_match_status);
}
