//! Startup profile, search, review, and credibility handlers.
//!
//! ```text
//! GET|POST|PUT|DELETE /api/v1/startups/me
//! GET /api/v1/startups/search?q=ledger&industry=fintech&stage=seed&sort=rating
//! GET /api/v1/startups/{startupId}
//! GET|POST /api/v1/startups/{startupId}/reviews
//! GET|POST /api/v1/startups/{startupId}/credibility
//! ```
//!
//! Search filters are decoded from the raw query string because `industry`
//! and `stage` repeat.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, PageRequest, SearchFilters, StartupDraft, StartupId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

pub use super::startups_dto::{
    CredibilityResponse, PageQuery, RatingSummaryResponse, ReviewRequest, ReviewResponse,
    SearchHitResponse, StartupRequest, StartupResponse,
};
use super::startups_dto::StartupPath;

const STARTUP_ID: FieldName = FieldName::new("startupId");

fn startup_id(path: &StartupPath) -> Result<StartupId, Error> {
    parse_id(&path.startup_id, STARTUP_ID)
}

/// Fetch the caller's startup profile.
#[utoipa::path(
    get,
    path = "/api/v1/startups/me",
    responses(
        (status = 200, description = "Startup profile", body = StartupResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No startup profile", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["startups"],
    operation_id = "getMyStartup"
)]
#[get("/startups/me")]
pub async fn get_my_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StartupResponse>> {
    let user = state.current_user(&session).await?;
    let startup = state.startups.mine(&user).await?;
    Ok(web::Json(startup.into()))
}

/// Create the caller's startup profile.
#[utoipa::path(
    post,
    path = "/api/v1/startups/me",
    request_body = StartupRequest,
    responses(
        (status = 201, description = "Startup created", body = StartupResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a startup account", body = ErrorSchema),
        (status = 409, description = "Startup already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["startups"],
    operation_id = "createMyStartup"
)]
#[post("/startups/me")]
pub async fn create_my_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StartupRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.current_user(&session).await?;
    let draft = StartupDraft::from(payload.into_inner());
    let startup = state.startups.create(&user, &draft).await?;
    Ok(HttpResponse::Created().json(StartupResponse::from(startup)))
}

/// Replace the caller's startup profile attributes.
#[utoipa::path(
    put,
    path = "/api/v1/startups/me",
    request_body = StartupRequest,
    responses(
        (status = 200, description = "Startup updated", body = StartupResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No startup profile", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["startups"],
    operation_id = "updateMyStartup"
)]
#[put("/startups/me")]
pub async fn update_my_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StartupRequest>,
) -> ApiResult<web::Json<StartupResponse>> {
    let user = state.current_user(&session).await?;
    let draft = StartupDraft::from(payload.into_inner());
    let startup = state.startups.update(&user, &draft).await?;
    Ok(web::Json(startup.into()))
}

/// Delete the caller's startup profile.
#[utoipa::path(
    delete,
    path = "/api/v1/startups/me",
    responses(
        (status = 204, description = "Startup deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No startup profile", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["startups"],
    operation_id = "deleteMyStartup"
)]
#[delete("/startups/me")]
pub async fn delete_my_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = state.current_user(&session).await?;
    state.startups.delete(&user).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Query parameters accepted by startup search besides the filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free-text match on name, tagline, and description.
    pub q: Option<String>,
    /// Industry filter; repeat for several.
    pub industry: Option<Vec<String>>,
    /// Funding stage filter; repeat for several.
    pub stage: Option<Vec<String>>,
    pub min_score: Option<u8>,
    pub min_rating: Option<f32>,
    pub verified: Option<bool>,
    /// One of `credibility`, `rating`, `upvotes`, `newest`, `name`.
    pub sort: Option<String>,
    /// Maximum rows returned.
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchLimit {
    limit: Option<u32>,
}

/// Search startup profiles.
#[utoipa::path(
    get,
    path = "/api/v1/startups/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching startups", body = [SearchHitResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["startups"],
    operation_id = "searchStartups",
    security([])
)]
#[get("/startups/search")]
pub async fn search_startups(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<SearchHitResponse>>> {
    let filters = SearchFilters::from_query_string(req.query_string())?;
    let SearchLimit { limit } = web::Query::<SearchLimit>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .map_err(|err| Error::invalid_request(format!("limit: {err}")))?;
    let hits = state.search.search(filters, limit).await?;
    Ok(web::Json(hits.into_iter().map(Into::into).collect()))
}

/// Fetch a startup profile by id.
#[utoipa::path(
    get,
    path = "/api/v1/startups/{startupId}",
    params(("startupId" = String, Path, description = "Startup identifier")),
    responses(
        (status = 200, description = "Startup profile", body = StartupResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["startups"],
    operation_id = "getStartup",
    security([])
)]
#[get("/startups/{startup_id}")]
pub async fn get_startup(
    state: web::Data<HttpState>,
    path: web::Path<StartupPath>,
) -> ApiResult<web::Json<StartupResponse>> {
    let id = startup_id(&path)?;
    let startup = state.startups.get(&id).await?;
    Ok(web::Json(startup.into()))
}

/// List reviews of a startup, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/startups/{startupId}/reviews",
    params(("startupId" = String, Path, description = "Startup identifier"), PageQuery),
    responses(
        (status = 200, description = "Reviews", body = [ReviewResponse]),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/startups/{startup_id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<StartupPath>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let id = startup_id(&path)?;
    let page = PageRequest::new(query.limit, query.offset);
    let reviews = state.reviews.list(&id, &page).await?;
    Ok(web::Json(reviews.into_iter().map(Into::into).collect()))
}

/// Review a startup.
#[utoipa::path(
    post,
    path = "/api/v1/startups/{startupId}/reviews",
    params(("startupId" = String, Path, description = "Startup identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Owners cannot review their own startup", body = ErrorSchema),
        (status = 404, description = "Startup not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/startups/{startup_id}/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<StartupPath>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let id = startup_id(&path)?;
    let user = state.current_user(&session).await?;
    let review = state
        .reviews
        .create(&user, &id, &payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

/// Latest credibility breakdown, computed on first request.
#[utoipa::path(
    get,
    path = "/api/v1/startups/{startupId}/credibility",
    params(("startupId" = String, Path, description = "Startup identifier")),
    responses(
        (status = 200, description = "Credibility breakdown", body = CredibilityResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Startup not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["credibility"],
    operation_id = "getCredibility",
    security([])
)]
#[get("/startups/{startup_id}/credibility")]
pub async fn get_credibility(
    state: web::Data<HttpState>,
    path: web::Path<StartupPath>,
) -> ApiResult<web::Json<CredibilityResponse>> {
    let id = startup_id(&path)?;
    let breakdown = state.credibility.get(&id).await?;
    Ok(web::Json(breakdown.into()))
}

/// Recompute and store a startup's credibility score.
#[utoipa::path(
    post,
    path = "/api/v1/startups/{startupId}/credibility",
    params(("startupId" = String, Path, description = "Startup identifier")),
    responses(
        (status = 200, description = "Fresh breakdown", body = CredibilityResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Only the owner may recompute", body = ErrorSchema),
        (status = 404, description = "Startup not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["credibility"],
    operation_id = "recomputeCredibility"
)]
#[post("/startups/{startup_id}/credibility")]
pub async fn recompute_credibility(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<StartupPath>,
) -> ApiResult<web::Json<CredibilityResponse>> {
    let id = startup_id(&path)?;
    let user = state.current_user(&session).await?;
    let breakdown = state.credibility.recompute(&user, &id).await?;
    Ok(web::Json(breakdown.into()))
}

/// Register every startup route on `cfg`.
///
/// Fixed segments (`me`, `search`) are registered before `{startup_id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_my_startup)
        .service(create_my_startup)
        .service(update_my_startup)
        .service(delete_my_startup)
        .service(search_startups)
        .service(get_startup)
        .service(list_reviews)
        .service(create_review)
        .service(get_credibility)
        .service(recompute_credibility);
}

#[cfg(test)]
#[path = "startups_tests.rs"]
mod tests;
