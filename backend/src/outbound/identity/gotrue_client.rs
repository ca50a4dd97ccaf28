//! Reqwest-backed GoTrue identity provider.
//!
//! This adapter owns transport details only: request bodies, the `apikey`
//! header, status classification, and decoding token responses into
//! [`AuthSession`] values. Every successful lifecycle call is published to
//! subscribers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tokio::sync::broadcast;
use tracing::debug;

use super::dto::{
    ErrorBodyDto, PasswordGrantDto, RefreshGrantDto, SignUpBodyDto, SignUpMetadataDto,
    SignUpResponseDto, TokenResponseDto,
};
use crate::domain::ports::{AUTH_EVENT_CAPACITY, IdentityProvider};
use crate::domain::{
    AuthError, AuthEvent, AuthSession, SignInCredentials, SignUpOutcome, SignUpRequest,
};

const SIGN_UP_PATH: &str = "auth/v1/signup";
const TOKEN_PATH: &str = "auth/v1/token";
const LOGOUT_PATH: &str = "auth/v1/logout";

/// Identity provider speaking the GoTrue REST API.
pub struct GoTrueIdentityProvider {
    client: Client,
    base_url: Url,
    api_key: String,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<AuthEvent>,
}

impl GoTrueIdentityProvider {
    /// Build a provider for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Self::with_clock(base_url, api_key, timeout, Arc::new(DefaultClock))
    }

    /// Build a provider that stamps relative expiries with `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_clock(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            api_key: api_key.into(),
            clock,
            events,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path)
            .map_err(|error| AuthError::Provider(format!("invalid auth endpoint: {error}")))
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.client
            .post(url)
            .header("apikey", self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, AuthError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: &impl serde::Serialize,
    ) -> Result<AuthSession, AuthError> {
        let mut url = self.endpoint(TOKEN_PATH)?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        let bytes = self.send(self.post(url).json(body)).await?;
        parse_session(&bytes, &*self.clock)
    }

    fn publish(&self, event: AuthEvent) {
        if self.events.send(event).is_err() {
            debug!("no auth event subscribers");
        }
    }
}

#[async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        let body = SignUpBodyDto {
            email: request.email().as_ref(),
            password: request.password(),
            data: SignUpMetadataDto {
                full_name: request.full_name().as_ref(),
                user_type: request.user_type().as_str(),
            },
        };
        let bytes = self
            .send(self.post(self.endpoint(SIGN_UP_PATH)?).json(&body))
            .await?;
        let outcome = parse_sign_up(&bytes, &*self.clock)?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.publish(AuthEvent::SignedIn(session.clone()));
        }
        Ok(outcome)
    }

    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSession, AuthError> {
        let body = PasswordGrantDto {
            email: credentials.email().as_ref(),
            password: credentials.password(),
        };
        let session = self.token_grant("password", &body).await?;
        self.publish(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        let request = self
            .post(self.endpoint(LOGOUT_PATH)?)
            .bearer_auth(session.access_token.as_str());
        let result = match request.send().await {
            Ok(response) => match response.status() {
                status if status.is_success() => Ok(()),
                // The token is already revoked or expired at the provider.
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(()),
                status => match response.bytes().await {
                    Ok(body) => Err(map_status_error(status, body.as_ref())),
                    Err(error) => Err(map_transport_error(error)),
                },
            },
            Err(error) => Err(map_transport_error(error)),
        };
        self.publish(AuthEvent::SignedOut);
        result
    }

    async fn refresh(&self, session: &AuthSession) -> Result<AuthSession, AuthError> {
        let body = RefreshGrantDto {
            refresh_token: session.refresh_token.as_str(),
        };
        let refreshed = self.token_grant("refresh_token", &body).await?;
        self.publish(AuthEvent::TokenRefreshed(refreshed.clone()));
        Ok(refreshed)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_session(body: &[u8], clock: &dyn Clock) -> Result<AuthSession, AuthError> {
    let decoded: TokenResponseDto = serde_json::from_slice(body).map_err(decode_error)?;
    decoded
        .into_domain_session(clock.utc())
        .map_err(|message| AuthError::Provider(format!("invalid auth response: {message}")))
}

fn parse_sign_up(body: &[u8], clock: &dyn Clock) -> Result<SignUpOutcome, AuthError> {
    let decoded: SignUpResponseDto = serde_json::from_slice(body).map_err(decode_error)?;
    let invalid = |message: String| AuthError::Provider(format!("invalid auth response: {message}"));
    match decoded {
        SignUpResponseDto::Session(token) => token
            .into_domain_session(clock.utc())
            .map(SignUpOutcome::SignedIn)
            .map_err(invalid),
        SignUpResponseDto::User(user) => {
            let (user_id, email) = user.into_identity().map_err(invalid)?;
            Ok(SignUpOutcome::ConfirmationRequired { user_id, email })
        }
    }
}

fn decode_error(error: serde_json::Error) -> AuthError {
    AuthError::Provider(format!("invalid auth response: {error}"))
}

fn map_transport_error(error: reqwest::Error) -> AuthError {
    debug!(%error, "auth transport failed");
    AuthError::NetworkUnreachable
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AuthError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return AuthError::RateLimited;
    }
    let message = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_message);
    match message {
        Some(message) => AuthError::from_provider_message(&message),
        None => AuthError::Provider(format!(
            "authentication service returned status {}",
            status.as_u16()
        )),
    }
}
