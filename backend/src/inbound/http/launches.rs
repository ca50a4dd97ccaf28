//! Launch feed, upvote, and comment handlers.
//!
//! ```text
//! GET /api/v1/launches?limit=20&offset=0
//! POST /api/v1/launches {"title":"Quantum Ledger 2.0"}
//! GET /api/v1/launches/{launchId}
//! POST /api/v1/launches/{launchId}/upvote
//! GET|POST /api/v1/launches/{launchId}/comments
//! GET /api/v1/startups/{startupId}/launches
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, LaunchDraft, LaunchId, PageRequest, StartupId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::startups::PageQuery;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

use super::launches_dto::{LaunchPath, StartupLaunchesPath};
pub use super::launches_dto::{
    CommentRequest, CommentResponse, LaunchRequest, LaunchResponse, UpvoteResponse,
};

fn launch_id(path: &LaunchPath) -> Result<LaunchId, Error> {
    parse_id(&path.launch_id, FieldName::new("launchId"))
}

/// Newest launches first.
#[utoipa::path(
    get,
    path = "/api/v1/launches",
    params(PageQuery),
    responses(
        (status = 200, description = "Launch feed", body = [LaunchResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["launches"],
    operation_id = "listLaunches",
    security([])
)]
#[get("/launches")]
pub async fn list_launches(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<LaunchResponse>>> {
    let page = PageRequest::new(query.limit, query.offset);
    let launches = state.launches.list(&page).await?;
    Ok(web::Json(launches.into_iter().map(Into::into).collect()))
}

/// Publish a launch for the caller's startup.
#[utoipa::path(
    post,
    path = "/api/v1/launches",
    request_body = LaunchRequest,
    responses(
        (status = 201, description = "Launch created", body = LaunchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "No startup profile", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["launches"],
    operation_id = "createLaunch"
)]
#[post("/launches")]
pub async fn create_launch(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LaunchRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.current_user(&session).await?;
    let draft = LaunchDraft::from(payload.into_inner());
    let launch = state.launches.create(&user, &draft).await?;
    Ok(HttpResponse::Created().json(LaunchResponse::from(launch)))
}

/// Fetch a launch and count the view.
#[utoipa::path(
    get,
    path = "/api/v1/launches/{launchId}",
    params(("launchId" = String, Path, description = "Launch identifier")),
    responses(
        (status = 200, description = "Launch", body = LaunchResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["launches"],
    operation_id = "getLaunch",
    security([])
)]
#[get("/launches/{launch_id}")]
pub async fn get_launch(
    state: web::Data<HttpState>,
    path: web::Path<LaunchPath>,
) -> ApiResult<web::Json<LaunchResponse>> {
    let id = launch_id(&path)?;
    let launch = state.launches.view(&id).await?;
    Ok(web::Json(launch.into()))
}

/// Toggle the caller's upvote on a launch.
#[utoipa::path(
    post,
    path = "/api/v1/launches/{launchId}/upvote",
    params(("launchId" = String, Path, description = "Launch identifier")),
    responses(
        (status = 200, description = "Upvote state after the toggle", body = UpvoteResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["launches"],
    operation_id = "toggleUpvote"
)]
#[post("/launches/{launch_id}/upvote")]
pub async fn toggle_upvote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<LaunchPath>,
) -> ApiResult<web::Json<UpvoteResponse>> {
    let id = launch_id(&path)?;
    let user = state.current_user(&session).await?;
    let toggle = state.launches.toggle_upvote(&user, &id).await?;
    Ok(web::Json(toggle.into()))
}

/// Comments on a launch, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/launches/{launchId}/comments",
    params(("launchId" = String, Path, description = "Launch identifier"), PageQuery),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Launch not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["launches"],
    operation_id = "listComments",
    security([])
)]
#[get("/launches/{launch_id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<LaunchPath>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let id = launch_id(&path)?;
    let page = PageRequest::new(query.limit, query.offset);
    let comments = state.launches.comments(&id, &page).await?;
    Ok(web::Json(comments.into_iter().map(Into::into).collect()))
}

/// Comment on a launch.
#[utoipa::path(
    post,
    path = "/api/v1/launches/{launchId}/comments",
    params(("launchId" = String, Path, description = "Launch identifier")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Launch not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["launches"],
    operation_id = "addComment"
)]
#[post("/launches/{launch_id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<LaunchPath>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let id = launch_id(&path)?;
    let user = state.current_user(&session).await?;
    let comment = state
        .launches
        .add_comment(&user, &id, &payload.content)
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Launches published by one startup.
#[utoipa::path(
    get,
    path = "/api/v1/startups/{startupId}/launches",
    params(("startupId" = String, Path, description = "Startup identifier")),
    responses(
        (status = 200, description = "Launches", body = [LaunchResponse]),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["launches"],
    operation_id = "listStartupLaunches",
    security([])
)]
#[get("/startups/{startup_id}/launches")]
pub async fn list_startup_launches(
    state: web::Data<HttpState>,
    path: web::Path<StartupLaunchesPath>,
) -> ApiResult<web::Json<Vec<LaunchResponse>>> {
    let id: StartupId = parse_id(&path.startup_id, FieldName::new("startupId"))?;
    let launches = state.launches.list_for_startup(&id).await?;
    Ok(web::Json(launches.into_iter().map(Into::into).collect()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_launches)
        .service(create_launch)
        .service(get_launch)
        .service(toggle_upvote)
        .service(list_comments)
        .service(add_comment)
        .service(list_startup_launches);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::MockLaunchRepository;
    use crate::domain::{Launch, LaunchContent, UpvoteToggle, UserType};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{
        SEED_SESSION_PATH, ports_for, seed_session, signed_in_cookie, state,
        test_session_middleware,
    };
    use crate::test_support::{fixture_timestamp, profile};

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .route(SEED_SESSION_PATH, web::post().to(seed_session))
            .service(web::scope("/api/v1").configure(configure))
    }

    fn launch() -> Launch {
        Launch {
            id: LaunchId::random(),
            startup_id: StartupId::random(),
            content: LaunchContent {
                title: "Quantum Ledger 2.0".to_owned(),
                tagline: None,
                description: None,
                product_url: None,
            },
            upvote_count: 3,
            comment_count: 0,
            view_count: 9,
            created_at: fixture_timestamp(),
        }
    }

    async fn json_body(response: actix_web::dev::ServiceResponse) -> Value {
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("json body")
    }

    #[actix_web::test]
    async fn feed_clamps_the_page_size() {
        let mut launches = MockLaunchRepository::new();
        launches
            .expect_list()
            .withf(|page| page.limit == 50 && page.offset == 10)
            .times(1)
            .returning(|_| Ok(vec![launch()]));
        let ports = HttpStatePorts {
            launches: Arc::new(launches),
            ..HttpStatePorts::fixtures()
        };
        let app = actix_test::init_service(test_app(state(ports))).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/v1/launches?limit=500&offset=10")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert_eq!(value[0]["title"], "Quantum Ledger 2.0");
        assert_eq!(value[0]["viewCount"], 9);
    }

    #[actix_web::test]
    async fn upvote_toggle_reports_the_new_state() {
        let user = profile(UserType::Enterprise);
        let target = launch();
        let mut launches = MockLaunchRepository::new();
        launches
            .expect_toggle_upvote()
            .times(1)
            .returning(|_, _| {
                Ok(Some(UpvoteToggle {
                    upvoted: true,
                    upvote_count: 4,
                }))
            });
        let ports = HttpStatePorts {
            launches: Arc::new(launches),
            ..ports_for(&user)
        };
        let app = actix_test::init_service(test_app(state(ports))).await;
        let cookie = signed_in_cookie(&app, &user).await;

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/launches/{}/upvote", target.id))
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert_eq!(value, serde_json::json!({ "upvoted": true, "upvoteCount": 4 }));
    }

    #[actix_web::test]
    async fn upvoting_requires_a_session() {
        let app = actix_test::init_service(test_app(state(HttpStatePorts::fixtures()))).await;
        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/launches/{}/upvote", LaunchId::random()))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn blank_comments_are_rejected_before_lookup() {
        let user = profile(UserType::Startup);
        let mut launches = MockLaunchRepository::new();
        launches.expect_find_by_id().never();
        let ports = HttpStatePorts {
            launches: Arc::new(launches),
            ..ports_for(&user)
        };
        let app = actix_test::init_service(test_app(state(ports))).await;
        let cookie = signed_in_cookie(&app, &user).await;

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/launches/{}/comments", LaunchId::random()))
            .cookie(cookie)
            .set_json(CommentRequest {
                content: "   ".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = json_body(response).await;
        assert_eq!(value["details"]["field"], "content");
    }

    #[actix_web::test]
    async fn missing_launches_are_not_found() {
        let app = actix_test::init_service(test_app(state(HttpStatePorts::fixtures()))).await;
        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/launches/{}", LaunchId::random()))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
