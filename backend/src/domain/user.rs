//! User identity and profile model.
//!
//! A profile row is authoritative for "what kind of user is this" and gates
//! which dashboards a caller may use. Identity (credentials, tokens) lives
//! with the identity provider; see [`crate::domain::auth`].

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Maximum length of a full name, in characters.
pub const FULL_NAME_MAX: usize = 100;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    EmptyFullName,
    FullNameTooLong { max: usize },
    InvalidAvatarUrl,
    UnknownUserType(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
            Self::InvalidAvatarUrl => write!(f, "avatar url must be an http(s) URL"),
            Self::UnknownUserType(value) => write!(
                f,
                "user type must be one of startup, enterprise, admin (got {value})"
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// The identity provider issues the id; profile rows reuse it as their
/// primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.1
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Email address, trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use ethaum::domain::Email;
    ///
    /// let email = Email::new("  Founder@Example.COM ").unwrap();
    /// assert_eq!(email.as_ref(), "founder@example.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name shown on dashboards and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate a full name; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        if trimmed.chars().count() > FULL_NAME_MAX {
            return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Marketplace role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Startup,
    Enterprise,
    Admin,
}

impl UserType {
    /// Database and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Enterprise => "enterprise",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "startup" => Ok(Self::Startup),
            "enterprise" => Ok(Self::Enterprise),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownUserType(other.to_owned())),
        }
    }
}

/// Parse an optional avatar URL, accepting only http(s) schemes.
pub fn parse_avatar_url(raw: &str) -> Result<Url, UserValidationError> {
    let url = Url::parse(raw.trim()).map_err(|_| UserValidationError::InvalidAvatarUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(UserValidationError::InvalidAvatarUrl),
    }
}

/// Authoritative profile row for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub full_name: FullName,
    pub avatar_url: Option<Url>,
    pub user_type: UserType,
}

impl UserProfile {
    /// Whether this profile may act with the permissions of `required`.
    ///
    /// Admins pass every role check.
    pub fn acts_as(&self, required: UserType) -> bool {
        self.user_type == required || self.user_type == UserType::Admin
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("no-at-sign", UserValidationError::InvalidEmail)]
    #[case("two words@example.com", UserValidationError::InvalidEmail)]
    #[case("user@nodot", UserValidationError::InvalidEmail)]
    fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw).expect_err("invalid email"), expected);
    }

    #[rstest]
    fn full_name_is_trimmed_and_bounded() {
        let name = FullName::new("  Ada Lovelace ").expect("valid");
        assert_eq!(name.as_ref(), "Ada Lovelace");
        assert_eq!(
            FullName::new("x".repeat(FULL_NAME_MAX + 1)).expect_err("too long"),
            UserValidationError::FullNameTooLong { max: FULL_NAME_MAX }
        );
        assert_eq!(
            FullName::new("   ").expect_err("blank"),
            UserValidationError::EmptyFullName
        );
    }

    #[rstest]
    #[case("startup", UserType::Startup)]
    #[case("enterprise", UserType::Enterprise)]
    #[case("admin", UserType::Admin)]
    fn user_type_parses_known_values(#[case] raw: &str, #[case] expected: UserType) {
        let parsed: UserType = raw.parse().expect("known type");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[rstest]
    fn user_type_rejects_unknown_values() {
        let err = "investor".parse::<UserType>().expect_err("unknown type");
        assert_eq!(err, UserValidationError::UnknownUserType("investor".into()));
    }

    #[rstest]
    #[case("https://cdn.example.com/a.png", true)]
    #[case("ftp://example.com/a.png", false)]
    #[case("not a url", false)]
    fn avatar_urls_must_be_http(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_avatar_url(raw).is_ok(), ok);
    }

    #[rstest]
    fn admins_act_as_every_role() {
        let profile = UserProfile {
            id: UserId::random(),
            email: Email::new("ops@ethaum.ai").expect("email"),
            full_name: FullName::new("Ops").expect("name"),
            avatar_url: None,
            user_type: UserType::Admin,
        };
        assert!(profile.acts_as(UserType::Startup));
        assert!(profile.acts_as(UserType::Enterprise));
    }

    #[rstest]
    fn profile_round_trips_through_camel_case_json() {
        let profile = UserProfile {
            id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("id"),
            email: Email::new("founder@example.com").expect("email"),
            full_name: FullName::new("Grace Hopper").expect("name"),
            avatar_url: None,
            user_type: UserType::Startup,
        };
        let value = serde_json::to_value(&profile).expect("serialise");
        assert_eq!(value["fullName"], "Grace Hopper");
        assert_eq!(value["userType"], "startup");
        let decoded: UserProfile = serde_json::from_value(value).expect("decode");
        assert_eq!(decoded, profile);
    }
}
