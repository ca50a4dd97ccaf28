//! Driven port for the remote AI endpoints.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{AiFeature, AiPayload};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling an AI endpoint.
    pub enum AiGatewayError {
        /// Network transport failed before receiving a response.
        Transport { message: String } => "ai transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } => "ai call timed out: {message}",
        /// The endpoint answered with a non-success status.
        Status { status: u16, message: String } => "ai endpoint returned {status}: {message}",
        /// The response body was not JSON.
        Decode { message: String } => "ai response decode failed: {message}",
        /// The payload could not be sent.
        InvalidRequest { message: String } => "ai request invalid: {message}",
    }
}

/// Port for invoking one AI feature.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn invoke(&self, feature: AiFeature, payload: &AiPayload) -> Result<Value, AiGatewayError>;
}

/// Gateway for deployments without an AI endpoint; always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAiGateway;

#[async_trait]
impl AiGateway for FixtureAiGateway {
    async fn invoke(&self, feature: AiFeature, _payload: &AiPayload) -> Result<Value, AiGatewayError> {
        Err(AiGatewayError::transport(format!(
            "no ai endpoint configured for {feature}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn status_error_formats_code() {
        let err = AiGatewayError::status(502_u16, "bad gateway");
        assert_eq!(err.to_string(), "ai endpoint returned 502: bad gateway");
    }
}
