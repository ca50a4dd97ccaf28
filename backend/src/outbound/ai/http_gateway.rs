//! Reqwest-backed AI gateway.
//!
//! JSON payloads are posted as JSON bodies; audio payloads go out as a
//! single-part multipart form under the `file` field. Any response that is
//! not a 2xx JSON document is an error; the assistant decides what to do
//! with it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::domain::ports::{AiGateway, AiGatewayError};
use crate::domain::{AiFeature, AiPayload};

const AUDIO_FIELD: &str = "file";

/// Gateway posting to `{base_url}/api/ai/{feature}`.
pub struct HttpAiGateway {
    client: Client,
    base_url: Url,
}

impl HttpAiGateway {
    /// Build a gateway using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, feature: AiFeature) -> Result<Url, AiGatewayError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{}", feature.remote_path()))
            .map_err(|error| AiGatewayError::invalid_request(error.to_string()))
    }
}

#[async_trait]
impl AiGateway for HttpAiGateway {
    async fn invoke(&self, feature: AiFeature, payload: &AiPayload) -> Result<Value, AiGatewayError> {
        let request = self
            .client
            .post(self.endpoint(feature)?)
            .header(reqwest::header::ACCEPT, "application/json");
        let request = match payload {
            AiPayload::Json(body) => request.json(body),
            AiPayload::Audio {
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(|error| AiGatewayError::invalid_request(error.to_string()))?;
                request.multipart(Form::new().part(AUDIO_FIELD, part))
            }
        };

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_body(body.as_ref())
    }
}

fn parse_body(body: &[u8]) -> Result<Value, AiGatewayError> {
    serde_json::from_slice(body)
        .map_err(|error| AiGatewayError::decode(format!("invalid AI JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> AiGatewayError {
    if error.is_timeout() {
        AiGatewayError::timeout(error.to_string())
    } else {
        AiGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AiGatewayError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect::<String>();
    AiGatewayError::status(status.as_u16(), preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://ai.example.com", "https://ai.example.com/api/ai/compare")]
    #[case("https://ai.example.com/", "https://ai.example.com/api/ai/compare")]
    #[case("https://example.com/proxy/", "https://example.com/proxy/api/ai/compare")]
    fn endpoint_appends_feature_path(#[case] base: &str, #[case] expected: &str) {
        let gateway = HttpAiGateway::new(Url::parse(base).expect("url"), Duration::from_secs(1))
            .expect("client");
        assert_eq!(
            gateway.endpoint(AiFeature::Compare).expect("endpoint").as_str(),
            expected
        );
    }

    #[rstest]
    fn status_errors_keep_a_compact_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"upstream\n   exploded");
        assert_eq!(error, AiGatewayError::status(502_u16, "upstream exploded"));
    }

    #[rstest]
    fn non_json_bodies_fail_to_decode() {
        assert!(matches!(
            parse_body(b"<html>"),
            Err(AiGatewayError::Decode { .. })
        ));
        assert_eq!(parse_body(br#"{"ok":true}"#).expect("json"), serde_json::json!({"ok": true}));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let gateway = HttpAiGateway::new(
            Url::parse("http://127.0.0.1:9").expect("url"),
            Duration::from_millis(500),
        )
        .expect("client");
        let error = gateway
            .invoke(AiFeature::Compare, &AiPayload::Json(serde_json::json!({})))
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(
            error,
            AiGatewayError::Transport { .. } | AiGatewayError::Timeout { .. }
        ));
    }
}
