//! Enterprise profile handlers.
//!
//! ```text
//! GET|POST|PUT|DELETE /api/v1/enterprises/me
//! GET /api/v1/enterprises/{enterpriseId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Enterprise, EnterpriseDraft, EnterpriseId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

#[derive(Debug, Deserialize)]
struct EnterprisePath {
    enterprise_id: String,
}

/// Enterprise profile form body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseRequest {
    #[schema(example = "Globex")]
    pub company_name: String,
    #[schema(example = "logistics")]
    pub industry: String,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    /// Funding stages of interest, e.g. `series_a`.
    #[serde(default)]
    pub preferred_stages: Vec<String>,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
    /// One of `under_50k`, `50k_250k`, `250k_1m`, `over_1m`.
    pub budget_range: Option<String>,
}

impl From<EnterpriseRequest> for EnterpriseDraft {
    fn from(value: EnterpriseRequest) -> Self {
        Self {
            company_name: value.company_name,
            industry: value.industry,
            company_size: value.company_size,
            headquarters: value.headquarters,
            website: value.website,
            description: value.description,
            preferred_stages: value.preferred_stages,
            preferred_industries: value.preferred_industries,
            budget_range: value.budget_range,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: String,
    #[schema(value_type = String, format = "uuid")]
    pub owner_id: String,
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

impl From<Enterprise> for EnterpriseResponse {
    fn from(value: Enterprise) -> Self {
        let profile = value.profile;
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            company_name: profile.company_name,
            industry: profile.industry,
            company_size: profile.company_size,
            headquarters: profile.headquarters,
            website: profile.website.map(String::from),
            description: profile.description,
            preferred_stages: profile
                .preferred_stages
                .into_iter()
                .map(|stage| stage.as_str().to_owned())
                .collect(),
            preferred_industries: profile.preferred_industries,
            budget_range: profile.budget_range.map(|range| range.as_str().to_owned()),
            created_at: value.created_at,
        }
    }
}

/// Fetch the caller's enterprise profile.
#[utoipa::path(
    get,
    path = "/api/v1/enterprises/me",
    responses(
        (status = 200, description = "Enterprise profile", body = EnterpriseResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No enterprise profile", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["enterprises"],
    operation_id = "getMyEnterprise"
)]
#[get("/enterprises/me")]
pub async fn get_my_enterprise(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<EnterpriseResponse>> {
    let user = state.current_user(&session).await?;
    let enterprise = state.enterprises.mine(&user).await?;
    Ok(web::Json(enterprise.into()))
}

/// Create the caller's enterprise profile.
#[utoipa::path(
    post,
    path = "/api/v1/enterprises/me",
    request_body = EnterpriseRequest,
    responses(
        (status = 201, description = "Enterprise created", body = EnterpriseResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an enterprise account", body = ErrorSchema),
        (status = 409, description = "Enterprise already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["enterprises"],
    operation_id = "createMyEnterprise"
)]
#[post("/enterprises/me")]
pub async fn create_my_enterprise(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EnterpriseRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.current_user(&session).await?;
    let draft = EnterpriseDraft::from(payload.into_inner());
    let enterprise = state.enterprises.create(&user, &draft).await?;
    Ok(HttpResponse::Created().json(EnterpriseResponse::from(enterprise)))
}

/// Replace the caller's enterprise profile attributes.
#[utoipa::path(
    put,
    path = "/api/v1/enterprises/me",
    request_body = EnterpriseRequest,
    responses(
        (status = 200, description = "Enterprise updated", body = EnterpriseResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No enterprise profile", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["enterprises"],
    operation_id = "updateMyEnterprise"
)]
#[put("/enterprises/me")]
pub async fn update_my_enterprise(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EnterpriseRequest>,
) -> ApiResult<web::Json<EnterpriseResponse>> {
    let user = state.current_user(&session).await?;
    let draft = EnterpriseDraft::from(payload.into_inner());
    let enterprise = state.enterprises.update(&user, &draft).await?;
    Ok(web::Json(enterprise.into()))
}

/// Delete the caller's enterprise profile.
#[utoipa::path(
    delete,
    path = "/api/v1/enterprises/me",
    responses(
        (status = 204, description = "Enterprise deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No enterprise profile", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["enterprises"],
    operation_id = "deleteMyEnterprise"
)]
#[delete("/enterprises/me")]
pub async fn delete_my_enterprise(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = state.current_user(&session).await?;
    state.enterprises.delete(&user).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fetch an enterprise profile by id.
#[utoipa::path(
    get,
    path = "/api/v1/enterprises/{enterpriseId}",
    params(("enterpriseId" = String, Path, description = "Enterprise identifier")),
    responses(
        (status = 200, description = "Enterprise profile", body = EnterpriseResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["enterprises"],
    operation_id = "getEnterprise",
    security([])
)]
#[get("/enterprises/{enterprise_id}")]
pub async fn get_enterprise(
    state: web::Data<HttpState>,
    path: web::Path<EnterprisePath>,
) -> ApiResult<web::Json<EnterpriseResponse>> {
    let id: EnterpriseId = parse_id(&path.enterprise_id, FieldName::new("enterpriseId"))?;
    let enterprise = state.enterprises.get(&id).await?;
    Ok(web::Json(enterprise.into()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_my_enterprise)
        .service(create_my_enterprise)
        .service(update_my_enterprise)
        .service(delete_my_enterprise)
        .service(get_enterprise);
}
