//! Cookie-backed session access for HTTP handlers.
//!
//! [`SessionContext`] wraps the actix session so handlers deal only with
//! domain values. It also implements [`SessionCache`], which lets a
//! per-request [`crate::domain::SessionSynchronizer`] use the private cookie
//! as its local cache.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::ports::{SessionCache, SessionCacheError};
use crate::domain::{AuthSession, Error, UserProfile};

pub(crate) const AUTH_SESSION_KEY: &str = "auth_session";
pub(crate) const PROFILE_KEY: &str = "profile";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionCacheError> {
        self.0
            .get::<T>(key)
            .map_err(|error| SessionCacheError::corrupt(format!("{key}: {error}")))
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionCacheError> {
        self.0
            .insert(key, value)
            .map_err(|error| SessionCacheError::io(format!("{key}: {error}")))
    }

    /// Return the stored provider session or `401 Unauthorized`.
    ///
    /// An unreadable cookie entry counts as signed out.
    pub fn require_session(&self) -> Result<AuthSession, Error> {
        let session = self.load_session().unwrap_or_else(|error| {
            warn!(%error, "discarding unreadable session cookie");
            None
        });
        session.ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl SessionCache for SessionContext {
    fn load_session(&self) -> Result<Option<AuthSession>, SessionCacheError> {
        self.get(AUTH_SESSION_KEY)
    }

    fn store_session(&self, session: &AuthSession) -> Result<(), SessionCacheError> {
        self.put(AUTH_SESSION_KEY, session)
    }

    fn load_profile(&self) -> Result<Option<UserProfile>, SessionCacheError> {
        self.get(PROFILE_KEY)
    }

    fn store_profile(&self, profile: &UserProfile) -> Result<(), SessionCacheError> {
        self.put(PROFILE_KEY, profile)
    }

    fn clear_profile(&self) -> Result<(), SessionCacheError> {
        self.0.remove(PROFILE_KEY);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionCacheError> {
        self.0.purge();
        Ok(())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserType;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use crate::test_support::{profile, session_for};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn stored_session_round_trips_through_the_cookie() {
        let user = profile(UserType::Startup);
        let stored = session_for(&user.id);
        let expected_id = user.id.to_string();
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(move |session: SessionContext| {
                        let stored = stored.clone();
                        let user = user.clone();
                        async move {
                            session.store_session(&stored).map_err(|e| Error::internal(e.to_string()))?;
                            session.store_profile(&user).map_err(|e| Error::internal(e.to_string()))?;
                            Ok::<_, Error>(HttpResponse::Ok())
                        }
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let current = session.require_session()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(current.user_id.to_string()))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, expected_id.as_bytes());
    }

    #[actix_web::test]
    async fn missing_session_is_unauthorised() {
        let app = test::init_service(App::new().wrap(test_session_middleware()).route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                session.require_session()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_session_entry_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: actix_session::Session| async move {
                        session
                            .insert(AUTH_SESSION_KEY, "not-a-session")
                            .expect("insert raw value");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        session.require_session()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set-invalid").to_request()).await;
        let cookie = session_cookie(&set_res);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/require").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
