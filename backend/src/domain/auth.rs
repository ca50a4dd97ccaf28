//! Authentication primitives: credentials, provider sessions, and the auth
//! error taxonomy.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::{Email, FullName, UserId, UserType, UserValidationError};

/// Minimum password length accepted at sign-up.
pub const PASSWORD_MIN: usize = 6;

/// Validation failures for sign-in and sign-up payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// The email, name, or user type failed profile validation.
    Profile(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Admin accounts are provisioned out of band.
    AdminSignUpNotAllowed,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::AdminSignUpNotAllowed => write!(f, "admin accounts cannot self-register"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl From<UserValidationError> for AuthValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Profile(value)
    }
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is normalised by [`Email::new`].
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use ethaum::domain::SignInCredentials;
///
/// let creds = SignInCredentials::try_from_parts("ada@example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated sign-up payload.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    email: Email,
    password: Zeroizing<String>,
    full_name: FullName,
    user_type: UserType,
}

impl SignUpRequest {
    /// Validate raw sign-up inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: &str,
        user_type: &str,
    ) -> Result<Self, AuthValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let full_name = FullName::new(full_name)?;
        let user_type: UserType = user_type.parse()?;
        if user_type == UserType::Admin {
            return Err(AuthValidationError::AdminSignUpNotAllowed);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            full_name,
            user_type,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("user_type", &self.user_type)
            .finish()
    }
}

/// Session issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: Email,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Whether the access token has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Result of a provider sign-up call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The provider issued a session immediately.
    SignedIn(AuthSession),
    /// The provider created the account but requires email confirmation.
    ConfirmationRequired { user_id: UserId, email: Email },
}

/// Session lifecycle events published by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    TokenRefreshed(AuthSession),
    SignedOut,
}

/// Fixed taxonomy of identity-provider failures.
///
/// `Display` yields the user-facing message. Unrecognised provider messages
/// pass through verbatim via [`AuthError::Provider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Unable to reach the authentication service. Check your connection and try again.")]
    NetworkUnreachable,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Please confirm your email address before signing in.")]
    EmailNotConfirmed,
    #[error("Too many attempts. Please wait a moment and try again.")]
    RateLimited,
    #[error("An account with this email already exists. Please sign in instead.")]
    AlreadyRegistered,
    #[error("This account is registered as {actual}. Please use the {expected} sign-in.")]
    UserTypeMismatch { expected: UserType, actual: UserType },
    #[error("{0}")]
    Provider(String),
}

impl AuthError {
    /// Classify a provider error message into the fixed taxonomy.
    ///
    /// # Examples
    /// ```
    /// use ethaum::domain::AuthError;
    ///
    /// assert_eq!(
    ///     AuthError::from_provider_message("Invalid login credentials"),
    ///     AuthError::InvalidCredentials
    /// );
    /// assert_eq!(
    ///     AuthError::from_provider_message("Database is on fire").to_string(),
    ///     "Database is on fire"
    /// );
    /// ```
    pub fn from_provider_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("failed to fetch")
            || lowered.contains("network")
            || lowered.contains("connection refused")
        {
            Self::NetworkUnreachable
        } else if lowered.contains("invalid login credentials")
            || lowered.contains("invalid email or password")
        {
            Self::InvalidCredentials
        } else if lowered.contains("email not confirmed") {
            Self::EmailNotConfirmed
        } else if lowered.contains("rate limit") || lowered.contains("too many requests") {
            Self::RateLimited
        } else if lowered.contains("already registered") || lowered.contains("already been registered")
        {
            Self::AlreadyRegistered
        } else {
            Self::Provider(message.to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", AuthValidationError::Profile(UserValidationError::EmptyEmail))]
    #[case("nope", "pw", AuthValidationError::Profile(UserValidationError::InvalidEmail))]
    #[case("ada@example.com", "", AuthValidationError::EmptyPassword)]
    fn sign_in_rejects_invalid_parts(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err = SignInCredentials::try_from_parts(email, password).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn sign_in_keeps_password_whitespace() {
        let creds = SignInCredentials::try_from_parts("ada@example.com", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
        assert!(!format!("{creds:?}").contains(" pw "));
    }

    #[rstest]
    #[case("ada@example.com", "12345", "Ada", "startup", AuthValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case("ada@example.com", "123456", " ", "startup", AuthValidationError::Profile(UserValidationError::EmptyFullName))]
    #[case("ada@example.com", "123456", "Ada", "investor", AuthValidationError::Profile(UserValidationError::UnknownUserType("investor".into())))]
    #[case("ada@example.com", "123456", "Ada", "admin", AuthValidationError::AdminSignUpNotAllowed)]
    fn sign_up_rejects_invalid_parts(
        #[case] email: &str,
        #[case] password: &str,
        #[case] name: &str,
        #[case] user_type: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err = SignUpRequest::try_from_parts(email, password, name, user_type)
            .expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("Invalid login credentials", AuthError::InvalidCredentials)]
    #[case("Email not confirmed", AuthError::EmailNotConfirmed)]
    #[case("For security purposes, rate limit exceeded", AuthError::RateLimited)]
    #[case("Too Many Requests", AuthError::RateLimited)]
    #[case("User already registered", AuthError::AlreadyRegistered)]
    #[case("A user with this email address has already been registered", AuthError::AlreadyRegistered)]
    #[case("TypeError: Failed to fetch", AuthError::NetworkUnreachable)]
    #[case("Signups not allowed for this instance", AuthError::Provider("Signups not allowed for this instance".into()))]
    fn provider_messages_map_to_taxonomy(#[case] message: &str, #[case] expected: AuthError) {
        assert_eq!(AuthError::from_provider_message(message), expected);
    }

    #[rstest]
    fn passthrough_messages_are_verbatim() {
        let err = AuthError::from_provider_message("Password should contain a digit");
        assert_eq!(err.to_string(), "Password should contain a digit");
    }

    #[rstest]
    fn mismatch_message_names_both_types() {
        let err = AuthError::UserTypeMismatch {
            expected: UserType::Enterprise,
            actual: UserType::Startup,
        };
        let message = err.to_string();
        assert!(message.contains("startup"));
        assert!(message.contains("enterprise"));
    }

    #[rstest]
    fn session_expiry_is_inclusive() {
        let now = Utc::now();
        let session = AuthSession {
            user_id: UserId::random(),
            email: Email::new("ada@example.com").expect("email"),
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: now,
        };
        assert!(session.is_expired(now));
        assert!(!session.is_expired(now - Duration::seconds(1)));
        assert!(!format!("{session:?}").contains("access"));
    }
}
