//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{MockProfileRepository, SessionCache};
use crate::domain::{AuthSession, Error, UserProfile};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::test_support::{fixture_clock, session_for};

/// Name of the session cookie in tests.
pub const TEST_SESSION_COOKIE: &str = "session";

/// Path of the helper route that seeds a provider session.
pub const SEED_SESSION_PATH: &str = "/__test/session";

/// Build a session middleware configured for tests.
///
/// A fresh key is generated per invocation and the `Secure` flag is off so
/// plain-HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(TEST_SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TEST_SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Handler storing the posted provider session in the cookie.
///
/// Register it at [`SEED_SESSION_PATH`] in test apps.
pub async fn seed_session(
    session: SessionContext,
    body: web::Json<AuthSession>,
) -> Result<HttpResponse, Error> {
    session
        .store_session(&body.into_inner())
        .map_err(|error| Error::internal(error.to_string()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fixture ports with a frozen clock and a profile repository that knows
/// `user`.
pub fn ports_for(user: &UserProfile) -> HttpStatePorts {
    let mut profiles = MockProfileRepository::new();
    let stored = user.clone();
    profiles
        .expect_fetch_profile()
        .returning(move |_| Ok(Some(stored.clone())));
    profiles.expect_upsert_profile().returning(|_| Ok(()));
    HttpStatePorts {
        profiles: Arc::new(profiles),
        clock: fixture_clock(),
        ..HttpStatePorts::fixtures()
    }
}

pub fn state(ports: HttpStatePorts) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ports))
}

/// Seed a session for `user` and return the resulting cookie.
pub async fn signed_in_cookie<S, B>(app: &S, user: &UserProfile) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri(SEED_SESSION_PATH)
        .set_json(session_for(&user.id))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "seed session failed");
    session_cookie(&response)
}
