//! DTOs for GoTrue auth responses.
//!
//! Token and sign-up responses decode here first and are mapped into
//! [`AuthSession`] in one pass.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthSession, Email, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshGrantDto<'a> {
    pub(super) refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpBodyDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: SignUpMetadataDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpMetadataDto<'a> {
    pub(super) full_name: &'a str,
    pub(super) user_type: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    pub(super) email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
    pub(super) refresh_token: String,
    pub(super) expires_in: Option<i64>,
    pub(super) expires_at: Option<i64>,
    pub(super) user: UserDto,
}

/// Sign-up answers with a session when email confirmation is disabled and
/// with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    Session(TokenResponseDto),
    User(UserDto),
}

/// Error envelope; GoTrue versions disagree on the field name.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    pub(super) error_description: Option<String>,
    pub(super) msg: Option<String>,
    pub(super) message: Option<String>,
    pub(super) error: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

impl UserDto {
    pub(super) fn into_identity(self) -> Result<(UserId, Email), String> {
        let user_id = UserId::new(&self.id).map_err(|error| format!("user id: {error}"))?;
        let email = self
            .email
            .ok_or_else(|| "user email missing".to_owned())
            .and_then(|raw| Email::new(raw).map_err(|error| format!("user email: {error}")))?;
        Ok((user_id, email))
    }
}

impl TokenResponseDto {
    pub(super) fn into_domain_session(self, now: DateTime<Utc>) -> Result<AuthSession, String> {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(epoch), _) => DateTime::from_timestamp(epoch, 0)
                .ok_or_else(|| format!("expires_at out of range: {epoch}"))?,
            (None, Some(seconds)) => now + Duration::seconds(seconds),
            (None, None) => return Err("token response carries no expiry".to_owned()),
        };
        let (user_id, email) = self.user.into_identity()?;
        Ok(AuthSession {
            user_id,
            email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        })
    }
}
