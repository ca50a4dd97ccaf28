//! Behaviour tests for the cookie-backed session lifecycle.
//!
//! A founder signs in through a portal, reads their session, and signs out
//! again. The identity provider is the in-process fixture; the profile table
//! is replaced with a single startup row so the portal check has data.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::header;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use ethaum::Trace;
use ethaum::domain::ports::{ProfileRepository, ProfileRepositoryError};
use ethaum::domain::{Email, FullName, UserId, UserProfile, UserType};
use ethaum::inbound::http::state::{HttpState, HttpStatePorts};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

const SESSION_COOKIE: &str = "session";

/// Profile table holding one startup founder, whoever signs in.
struct StartupFounderProfiles;

#[async_trait]
impl ProfileRepository for StartupFounderProfiles {
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(Some(UserProfile {
            id: id.clone(),
            email: Email::new("founder@example.com").expect("fixture email"),
            full_name: FullName::new("Grace Hopper").expect("fixture name"),
            avatar_url: None,
            user_type: UserType::Startup,
        }))
    }

    async fn upsert_profile(&self, _profile: &UserProfile) -> Result<(), ProfileRepositoryError> {
        Ok(())
    }
}

struct SessionWorld {
    runtime: Runtime,
    local: LocalSet,
    key: Key,
    state: web::Data<HttpState>,
    cookie: Option<Cookie<'static>>,
    last_status: Option<u16>,
    last_location: Option<String>,
    last_body: Value,
}

type SharedWorld = Rc<RefCell<SessionWorld>>;

struct Exchange {
    status: u16,
    location: Option<String>,
    cookie: Option<Cookie<'static>>,
    body: Value,
}

#[fixture]
fn world() -> SharedWorld {
    let ports = HttpStatePorts {
        profiles: Arc::new(StartupFounderProfiles),
        ..HttpStatePorts::fixtures()
    };
    Rc::new(RefCell::new(SessionWorld {
        runtime: tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime"),
        local: LocalSet::new(),
        key: Key::generate(),
        state: web::Data::new(HttpState::new(ports)),
        cookie: None,
        last_status: None,
        last_location: None,
        last_body: Value::Null,
    }))
}

/// Send `request` through a freshly built app and remember the outcome.
fn exchange(world: &SharedWorld, request: actix_test::TestRequest) {
    let ctx = world.borrow();
    let key = ctx.key.clone();
    let state = ctx.state.clone();
    let request = match &ctx.cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    };

    let outcome = ctx.local.block_on(&ctx.runtime, async move {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
            .cookie_name(SESSION_COOKIE.into())
            .cookie_secure(false)
            .cookie_content_security(CookieContentSecurity::Private)
            .build();
        let app = actix_test::init_service(
            App::new().app_data(state).wrap(Trace).service(
                web::scope("/api/v1")
                    .wrap(session)
                    .configure(ethaum::inbound::http::configure),
            ),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(Cookie::into_owned);
        let bytes = actix_test::read_body(response).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Exchange {
            status,
            location,
            cookie,
            body,
        }
    });
    drop(ctx);

    let mut ctx = world.borrow_mut();
    if let Some(cookie) = outcome.cookie {
        ctx.cookie = (!cookie.value().is_empty()).then_some(cookie);
    }
    ctx.last_status = Some(outcome.status);
    ctx.last_location = outcome.location;
    ctx.last_body = outcome.body;
}

fn sign_in_as(world: &SharedWorld, expected: &str) {
    exchange(
        world,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/sign-in")
            .set_json(json!({
                "email": "founder@example.com",
                "password": "correct-horse",
                "expectedUserType": expected
            })),
    );
}

#[given("a running API with a known startup profile")]
fn a_running_api_with_a_known_startup_profile(world: &SharedWorld) {
    assert!(world.borrow().cookie.is_none());
}

#[when("the founder signs in through the startup portal")]
fn the_founder_signs_in_through_the_startup_portal(world: &SharedWorld) {
    sign_in_as(world, "startup");
}

#[when("the founder signs in through the enterprise portal")]
fn the_founder_signs_in_through_the_enterprise_portal(world: &SharedWorld) {
    sign_in_as(world, "enterprise");
}

#[when("the founder signs out")]
fn the_founder_signs_out(world: &SharedWorld) {
    exchange(world, actix_test::TestRequest::post().uri("/api/v1/auth/sign-out"));
}

#[then("the session is anonymous")]
fn the_session_is_anonymous(world: &SharedWorld) {
    exchange(world, actix_test::TestRequest::get().uri("/api/v1/session"));
    let ctx = world.borrow();
    assert_eq!(ctx.last_status, Some(200));
    assert_eq!(ctx.last_body["state"], "anonymous");
    assert!(ctx.last_body["userId"].is_null());
}

#[then("the session is authenticated with a ready profile")]
fn the_session_is_authenticated_with_a_ready_profile(world: &SharedWorld) {
    assert_eq!(world.borrow().last_status, Some(200));
    exchange(world, actix_test::TestRequest::get().uri("/api/v1/session"));
    let ctx = world.borrow();
    assert_eq!(ctx.last_status, Some(200));
    assert_eq!(ctx.last_body["state"], "authenticated");
    assert_eq!(ctx.last_body["profileStatus"], "ready");
    assert_eq!(ctx.last_body["profile"]["userType"], "startup");
}

#[then("the response redirects home")]
fn the_response_redirects_home(world: &SharedWorld) {
    let ctx = world.borrow();
    assert_eq!(ctx.last_status, Some(303));
    assert_eq!(ctx.last_location.as_deref(), Some("/"));
}

#[then("the sign-in is rejected as a user type mismatch")]
fn the_sign_in_is_rejected_as_a_user_type_mismatch(world: &SharedWorld) {
    let ctx = world.borrow();
    assert_eq!(ctx.last_status, Some(403));
    assert_eq!(ctx.last_body["details"]["reason"], "user_type_mismatch");
    assert!(ctx.last_body["traceId"].is_string());
}

#[scenario(path = "tests/features/session_sign_in.feature")]
fn session_sign_in(world: SharedWorld) {
    drop(world);
}

#[scenario(path = "tests/features/session_wrong_portal.feature")]
fn session_wrong_portal(world: SharedWorld) {
    drop(world);
}
