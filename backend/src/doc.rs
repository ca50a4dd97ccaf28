//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler, the health probes, and the
//! wrapper schemas from [`crate::inbound::http::schemas`] that describe
//! domain types without deriving utoipa traits on them. Swagger UI serves it
//! in debug builds; `openapi-dump` prints it for tooling.

use crate::inbound::http::ai::AiFeatureResponse;
use crate::inbound::http::auth::{
    ConfirmationPendingResponse, SessionResponse, SignInRequestBody, SignUpRequestBody,
};
use crate::inbound::http::enterprises::{EnterpriseRequest, EnterpriseResponse};
use crate::inbound::http::launches::{
    CommentRequest, CommentResponse, LaunchRequest, LaunchResponse, UpvoteResponse,
};
use crate::inbound::http::matches::{MatchResponse, MatchStatusRequest};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, UserProfileSchema, UserTypeSchema,
};
use crate::inbound::http::startups::{
    CredibilityResponse, RatingSummaryResponse, ReviewRequest, ReviewResponse, SearchHitResponse,
    StartupRequest, StartupResponse,
};
use crate::inbound::http::users::ProfileUpdateRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/auth/sign-in.",
            ))),
        );
    }
}

/// OpenAPI document for the marketplace API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "EthAum API",
        description = "Startup launches, reviews, enterprise matching, credibility scores and AI assistance."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::startups::get_my_startup,
        crate::inbound::http::startups::create_my_startup,
        crate::inbound::http::startups::update_my_startup,
        crate::inbound::http::startups::delete_my_startup,
        crate::inbound::http::startups::search_startups,
        crate::inbound::http::startups::get_startup,
        crate::inbound::http::startups::list_reviews,
        crate::inbound::http::startups::create_review,
        crate::inbound::http::startups::get_credibility,
        crate::inbound::http::startups::recompute_credibility,
        crate::inbound::http::launches::list_launches,
        crate::inbound::http::launches::create_launch,
        crate::inbound::http::launches::get_launch,
        crate::inbound::http::launches::toggle_upvote,
        crate::inbound::http::launches::list_comments,
        crate::inbound::http::launches::add_comment,
        crate::inbound::http::launches::list_startup_launches,
        crate::inbound::http::enterprises::get_my_enterprise,
        crate::inbound::http::enterprises::create_my_enterprise,
        crate::inbound::http::enterprises::update_my_enterprise,
        crate::inbound::http::enterprises::delete_my_enterprise,
        crate::inbound::http::enterprises::get_enterprise,
        crate::inbound::http::matches::list_matches,
        crate::inbound::http::matches::set_match_status,
        crate::inbound::http::ai::run_feature,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserProfileSchema,
        UserTypeSchema,
        SignUpRequestBody,
        SignInRequestBody,
        SessionResponse,
        ConfirmationPendingResponse,
        ProfileUpdateRequest,
        StartupRequest,
        StartupResponse,
        SearchHitResponse,
        RatingSummaryResponse,
        ReviewRequest,
        ReviewResponse,
        CredibilityResponse,
        LaunchRequest,
        LaunchResponse,
        UpvoteResponse,
        CommentRequest,
        CommentResponse,
        EnterpriseRequest,
        EnterpriseResponse,
        MatchStatusRequest,
        MatchResponse,
        AiFeatureResponse,
    )),
    tags(
        (name = "auth", description = "Sign-up, sign-in and session state"),
        (name = "users", description = "Signed-in user profile"),
        (name = "startups", description = "Startup profiles, search, reviews and credibility"),
        (name = "launches", description = "Product launches, upvotes and comments"),
        (name = "enterprises", description = "Enterprise buyer profiles"),
        (name = "matches", description = "Startup and enterprise pairings"),
        (name = "ai", description = "AI-assisted features with demo fallbacks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const PROFILE_SCHEMA_NAME: &str = "crate.domain.UserProfile";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "code")]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case(PROFILE_SCHEMA_NAME, "fullName")]
    #[case(PROFILE_SCHEMA_NAME, "userType")]
    fn registered_schemas_expose_camel_case_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/v1/auth/sign-in")]
    #[case("/api/v1/startups/search")]
    #[case("/api/v1/launches/{launchId}/upvote")]
    #[case("/api/v1/ai/{feature}")]
    #[case("/health/ready")]
    fn document_lists_public_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn ai_features_accept_json_or_audio() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/v1/ai/{feature}").expect("ai path");
        let body = item
            .post
            .as_ref()
            .and_then(|operation| operation.request_body.as_ref())
            .expect("request body");
        assert!(body.content.contains_key("application/json"));
        assert!(body.content.contains_key("application/octet-stream"));
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
