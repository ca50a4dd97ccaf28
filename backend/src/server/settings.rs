//! Server settings loaded via OrthoConfig.
//!
//! Every field can be set through an `ETHAUM_*` environment variable, a
//! command-line flag, or a configuration file. Unset optional adapters fall
//! back to fixtures so the server runs without external services.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::warn;
use url::Url;
use zeroize::Zeroize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;
const SESSION_KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

/// Values controlling how the server binds and which adapters it wires.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ETHAUM")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Fixture repositories are used when unset.
    pub database_url: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Base URL of the GoTrue-compatible identity service.
    pub identity_url: Option<String>,
    /// Anonymous API key sent as the `apikey` header.
    pub identity_anon_key: Option<String>,
    pub identity_timeout_secs: Option<u64>,
    /// Base URL hosting the `/api/ai/*` endpoints.
    pub ai_base_url: Option<String>,
    pub ai_timeout_secs: Option<u64>,
    /// File holding the cookie signing and encryption key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Generate a throwaway session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
}

/// Errors raised while turning settings into server configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid {name} '{value}': {message}")]
    Url {
        name: &'static str,
        value: String,
        message: String,
    },
    #[error("ETHAUM_IDENTITY_URL is set but ETHAUM_IDENTITY_ANON_KEY is missing")]
    MissingAnonKey,
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Connection details for the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    pub url: Url,
    pub anon_key: String,
    pub timeout: Duration,
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|error| SettingsError::Url {
        name,
        value: value.to_owned(),
        message: error.to_string(),
    })
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|error: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Identity service settings, or `None` to use the fixture provider.
    pub fn identity(&self) -> Result<Option<IdentitySettings>, SettingsError> {
        let Some(raw) = self.identity_url.as_deref().filter(|url| !url.is_empty()) else {
            return Ok(None);
        };
        let url = parse_url("identity url", raw)?;
        let anon_key = self
            .identity_anon_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingAnonKey)?;
        Ok(Some(IdentitySettings {
            url,
            anon_key,
            timeout: Duration::from_secs(
                self.identity_timeout_secs
                    .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
            ),
        }))
    }

    /// AI endpoint base URL and timeout, or `None` to serve demo payloads.
    pub fn ai(&self) -> Result<Option<(Url, Duration)>, SettingsError> {
        let Some(raw) = self.ai_base_url.as_deref().filter(|url| !url.is_empty()) else {
            return Ok(None);
        };
        let url = parse_url("AI base url", raw)?;
        let timeout =
            Duration::from_secs(self.ai_timeout_secs.unwrap_or(DEFAULT_AI_TIMEOUT_SECS));
        Ok(Some((url, timeout)))
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Load the session key.
    ///
    /// Release builds require at least 64 bytes of key material. An
    /// unreadable file yields a temporary key only in debug builds or when
    /// ephemeral keys are allowed.
    pub fn session_key(&self, release: bool) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(&path) {
            Ok(mut bytes) => {
                let length = bytes.len();
                if release && length < SESSION_KEY_MIN_LEN {
                    bytes.zeroize();
                    return Err(SettingsError::KeyTooShort {
                        path,
                        length,
                        min_len: SESSION_KEY_MIN_LEN,
                    });
                }
                let key = Key::derive_from(&bytes);
                bytes.zeroize();
                Ok(key)
            }
            Err(error) if !release || self.allow_ephemeral_session_key => {
                warn!(
                    path = %path.display(),
                    %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::KeyRead { path, source }),
        }
    }
}

/// Short hex fingerprint of the signing half of `key`, safe to log.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::io::Write;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "ETHAUM_BIND_ADDR",
        "ETHAUM_DATABASE_URL",
        "ETHAUM_IDENTITY_URL",
        "ETHAUM_IDENTITY_ANON_KEY",
        "ETHAUM_AI_BASE_URL",
        "ETHAUM_SESSION_KEY_FILE",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("ethaum")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_select_fixture_adapters() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket address")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.identity().expect("identity settings").is_none());
        assert!(settings.ai().expect("ai settings").is_none());
        assert!(settings.cookie_secure);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.extend([
            ("ETHAUM_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("ETHAUM_IDENTITY_URL", Some("https://auth.example.com".to_owned())),
            ("ETHAUM_IDENTITY_ANON_KEY", Some("anon".to_owned())),
            ("ETHAUM_AI_BASE_URL", Some("https://ai.example.com".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address").port(),
            9090
        );
        let identity = settings.identity().expect("valid").expect("configured");
        assert_eq!(identity.url.as_str(), "https://auth.example.com/");
        assert_eq!(identity.anon_key, "anon");
        let (ai_url, timeout) = settings.ai().expect("valid").expect("configured");
        assert_eq!(ai_url.host_str(), Some("ai.example.com"));
        assert_eq!(timeout, Duration::from_secs(60));
    }

    #[rstest]
    fn identity_without_anon_key_is_rejected() {
        let mut vars = cleared();
        vars.push(("ETHAUM_IDENTITY_URL", Some("https://auth.example.com".to_owned())));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.identity(),
            Err(SettingsError::MissingAnonKey)
        ));
    }

    #[rstest]
    #[case(vec![b'k'; 64], true, true)]
    #[case(vec![b'k'; 16], true, false)]
    #[case(vec![b'k'; 16], false, true)]
    fn session_key_length_is_enforced_in_release(
        #[case] material: Vec<u8>,
        #[case] release: bool,
        #[case] accepted: bool,
    ) {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&material).expect("write key");
        let mut vars = cleared();
        vars.pop();
        vars.push((
            "ETHAUM_SESSION_KEY_FILE",
            Some(file.path().display().to_string()),
        ));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(settings.session_key(release).is_ok(), accepted);
    }

    #[rstest]
    fn missing_key_file_is_fatal_in_release() {
        let mut vars = cleared();
        vars.pop();
        vars.push((
            "ETHAUM_SESSION_KEY_FILE",
            Some("/nonexistent/ethaum/session_key".to_owned()),
        ));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.session_key(true),
            Err(SettingsError::KeyRead { .. })
        ));
        assert!(settings.session_key(false).is_ok());
    }

    #[rstest]
    fn fingerprints_identify_keys_without_revealing_them() {
        let key = Key::derive_from(&[b'k'; 64]);
        let fingerprint = key_fingerprint(&key);
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert_eq!(fingerprint, key_fingerprint(&Key::derive_from(&[b'k'; 64])));
        assert_ne!(fingerprint, key_fingerprint(&Key::derive_from(&[b'j'; 64])));
    }
}
