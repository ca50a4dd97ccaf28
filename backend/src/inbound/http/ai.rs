//! AI feature endpoint.
//!
//! ```text
//! POST /api/v1/ai/compare {"first":{...},"second":{...}}
//! POST /api/v1/ai/transcribe   (raw audio body, Content-Type: audio/webm)
//! ```
//!
//! Every feature answers `200` with the same envelope whether the remote
//! call succeeded or the demo payload was substituted; `source` tells the
//! two apart.

use actix_web::http::header;
use actix_web::{HttpRequest, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{AiFeature, AiPayload, AiResponse, AiSource, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, unknown_value_error};

/// Header naming the uploaded audio file.
pub const FILE_NAME_HEADER: &str = "x-file-name";
const DEFAULT_AUDIO_TYPE: &str = "application/octet-stream";
const DEFAULT_AUDIO_NAME: &str = "recording";
/// Upper bound for request bodies, sized for recorded pitches.
pub const UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct FeaturePath {
    feature: String,
}

/// Envelope returned by every AI feature.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiFeatureResponse {
    #[schema(example = "predict-deal")]
    pub feature: String,
    /// `live` or `fallback`.
    #[schema(example = "live")]
    pub source: String,
    /// Feature-specific result object.
    pub data: Value,
}

impl From<AiResponse> for AiFeatureResponse {
    fn from(value: AiResponse) -> Self {
        Self {
            feature: value.feature.slug().to_owned(),
            source: match value.source {
                AiSource::Live => "live",
                AiSource::Fallback => "fallback",
            }
            .to_owned(),
            data: value.body,
        }
    }
}

fn parse_feature(raw: &str) -> Result<AiFeature, Error> {
    raw.parse::<AiFeature>().map_err(|value| {
        let expected = AiFeature::ALL.map(AiFeature::slug);
        unknown_value_error(FieldName::new("feature"), &value, &expected)
    })
}

fn payload_for(feature: AiFeature, req: &HttpRequest, body: web::Bytes) -> Result<AiPayload, Error> {
    if feature.takes_audio() {
        if body.is_empty() {
            return Err(Error::invalid_request("audio upload must not be empty"));
        }
        let header_value = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        return Ok(AiPayload::Audio {
            file_name: header_value(FILE_NAME_HEADER).unwrap_or_else(|| DEFAULT_AUDIO_NAME.to_owned()),
            content_type: header_value(header::CONTENT_TYPE.as_str())
                .unwrap_or_else(|| DEFAULT_AUDIO_TYPE.to_owned()),
            bytes: body.to_vec(),
        });
    }
    if body.is_empty() {
        return Ok(AiPayload::Json(Value::Object(serde_json::Map::new())));
    }
    serde_json::from_slice::<Value>(&body)
        .map(AiPayload::Json)
        .map_err(|err| Error::invalid_request(format!("request body must be JSON: {err}")))
}

/// Run one AI-assisted feature.
#[utoipa::path(
    post,
    path = "/api/v1/ai/{feature}",
    params(("feature" = String, Path, description = "Feature slug, e.g. `predict-deal`")),
    request_body(
        content(
            (Object = "application/json"),
            (Object = "application/octet-stream")
        ),
        description = "JSON input, or raw audio for `transcribe`"
    ),
    responses(
        (status = 200, description = "Live or demo result", body = AiFeatureResponse),
        (status = 400, description = "Unknown feature or malformed body", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ai"],
    operation_id = "runAiFeature",
    security([])
)]
#[post("/{feature}")]
pub async fn run_feature(
    state: web::Data<HttpState>,
    path: web::Path<FeaturePath>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<AiFeatureResponse>> {
    let feature = parse_feature(&path.feature)?;
    let payload = payload_for(feature, &req, body)?;
    let response = state.ai.run(feature, &payload).await?;
    Ok(web::Json(response.into()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ai")
            .app_data(web::PayloadConfig::new(UPLOAD_LIMIT_BYTES))
            .service(run_feature),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::{AiGatewayError, MockAiGateway};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::state;

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .service(web::scope("/api/v1").configure(configure))
    }

    async fn call(app_state: web::Data<HttpState>, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(app_state)).await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[rstest]
    #[actix_web::test]
    async fn gateway_failures_serve_the_demo_payload() {
        let mut gateway = MockAiGateway::new();
        gateway
            .expect_invoke()
            .returning(|_, _| Err(AiGatewayError::status(503_u16, "down")));
        let ports = HttpStatePorts {
            ai: Arc::new(gateway),
            ..HttpStatePorts::fixtures()
        };
        let (status, value) = call(
            state(ports),
            actix_test::TestRequest::post()
                .uri("/api/v1/ai/predict-deal")
                .set_json(json!({ "startupId": "s-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["source"], "fallback");
        assert_eq!(value["feature"], "predict-deal");
        assert_eq!(value["data"], AiFeature::PredictDeal.fallback());
    }

    #[rstest]
    #[actix_web::test]
    async fn live_results_are_wrapped() {
        let mut gateway = MockAiGateway::new();
        gateway
            .expect_invoke()
            .withf(|feature, payload| {
                *feature == AiFeature::AnalyzeReview
                    && *payload == AiPayload::Json(json!({ "text": "great" }))
            })
            .returning(|_, _| Ok(json!({ "sentiment": "positive" })));
        let ports = HttpStatePorts {
            ai: Arc::new(gateway),
            ..HttpStatePorts::fixtures()
        };
        let (status, value) = call(
            state(ports),
            actix_test::TestRequest::post()
                .uri("/api/v1/ai/analyze-review")
                .set_json(json!({ "text": "great" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["source"], "live");
        assert_eq!(value["data"]["sentiment"], "positive");
    }

    #[rstest]
    #[actix_web::test]
    async fn transcription_forwards_the_raw_audio() {
        let mut gateway = MockAiGateway::new();
        gateway
            .expect_invoke()
            .withf(|_, payload| {
                matches!(
                    payload,
                    AiPayload::Audio { file_name, content_type, bytes }
                        if file_name == "memo.webm"
                            && content_type == "audio/webm"
                            && *bytes == vec![1_u8, 2, 3]
                )
            })
            .returning(|_, _| Ok(json!({ "text": "hello" })));
        let ports = HttpStatePorts {
            ai: Arc::new(gateway),
            ..HttpStatePorts::fixtures()
        };
        let (status, value) = call(
            state(ports),
            actix_test::TestRequest::post()
                .uri("/api/v1/ai/transcribe")
                .insert_header((header::CONTENT_TYPE, "audio/webm"))
                .insert_header((FILE_NAME_HEADER, "memo.webm"))
                .set_payload(vec![1_u8, 2, 3]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["data"]["text"], "hello");
    }

    #[rstest]
    #[actix_web::test]
    async fn recordings_above_the_default_body_limit_reach_the_assistant() {
        let mut gateway = MockAiGateway::new();
        gateway
            .expect_invoke()
            .withf(|_, payload| {
                matches!(payload, AiPayload::Audio { bytes, .. } if bytes.len() == 300 * 1024)
            })
            .times(1)
            .returning(|_, _| Err(AiGatewayError::status(502_u16, "bad gateway")));
        let ports = HttpStatePorts {
            ai: Arc::new(gateway),
            ..HttpStatePorts::fixtures()
        };
        let (status, value) = call(
            state(ports),
            actix_test::TestRequest::post()
                .uri("/api/v1/ai/transcribe")
                .insert_header((header::CONTENT_TYPE, "audio/webm"))
                .set_payload(vec![0_u8; 300 * 1024]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["source"], "fallback");
        assert_eq!(value["data"], AiFeature::Transcribe.fallback());
    }

    #[rstest]
    #[case("/api/v1/ai/horoscope", "feature")]
    #[actix_web::test]
    async fn unknown_features_are_rejected(#[case] uri: &str, #[case] field: &str) {
        let (status, value) = call(
            state(HttpStatePorts::fixtures()),
            actix_test::TestRequest::post().uri(uri).set_json(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_rejected() {
        let (status, value) = call(
            state(HttpStatePorts::fixtures()),
            actix_test::TestRequest::post()
                .uri("/api/v1/ai/compare")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["code"], "invalid_request");
    }
}
