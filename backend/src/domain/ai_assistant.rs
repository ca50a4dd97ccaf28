//! AI feature dispatch with demo fallbacks.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::AiGateway;
use crate::domain::{AiFeature, AiPayload, AiResponse, Error};

/// Runs AI features against the gateway, substituting the feature's demo
/// payload whenever the live call fails.
#[derive(Clone)]
pub struct AiAssistant {
    gateway: Arc<dyn AiGateway>,
}

impl AiAssistant {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self { gateway }
    }

    /// Run `feature`. Gateway failures never surface; only a payload of the
    /// wrong kind is rejected.
    pub async fn run(&self, feature: AiFeature, payload: &AiPayload) -> Result<AiResponse, Error> {
        let audio = matches!(payload, AiPayload::Audio { .. });
        if audio != feature.takes_audio() {
            return Err(Error::invalid_request(if feature.takes_audio() {
                format!("{feature} expects an audio upload")
            } else {
                format!("{feature} expects a JSON body")
            }));
        }
        match self.gateway.invoke(feature, payload).await {
            Ok(body) => {
                debug!(%feature, "ai feature answered live");
                Ok(AiResponse::live(feature, body))
            }
            Err(error) => {
                warn!(%error, %feature, "ai feature failed; serving demo payload");
                Ok(AiResponse::fallback(feature))
            }
        }
    }
}
