//! AI-assisted features and their demo fallbacks.
//!
//! Every feature is one POST to a remote endpoint. When the call fails for
//! any reason the caller receives the feature's fixed demo payload instead,
//! in the same shape a live response would have.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

/// One AI-assisted utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiFeature {
    Compare,
    PredictDeal,
    GenerateBrief,
    AnalyzePitch,
    AnalyzeReview,
    Transcribe,
    GenerateLaunchContent,
}

impl AiFeature {
    pub const ALL: [Self; 7] = [
        Self::Compare,
        Self::PredictDeal,
        Self::GenerateBrief,
        Self::AnalyzePitch,
        Self::AnalyzeReview,
        Self::Transcribe,
        Self::GenerateLaunchContent,
    ];

    /// Route segment naming the feature.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Compare => "compare",
            Self::PredictDeal => "predict-deal",
            Self::GenerateBrief => "generate-brief",
            Self::AnalyzePitch => "analyze-pitch",
            Self::AnalyzeReview => "analyze-review",
            Self::Transcribe => "transcribe",
            Self::GenerateLaunchContent => "generate-launch-content",
        }
    }

    /// Path of the remote endpoint, relative to the AI base URL.
    pub fn remote_path(self) -> String {
        format!("/api/ai/{}", self.slug())
    }

    /// Whether the feature takes an audio upload rather than JSON.
    pub fn takes_audio(self) -> bool {
        matches!(self, Self::Transcribe)
    }

    /// Demo payload substituted when the live call fails.
    pub fn fallback(self) -> Value {
        match self {
            Self::Compare => json!({
                "summary": "Both products target mid-market teams; the first leads on integrations, the second on price.",
                "winner": "first",
                "criteria": [
                    { "name": "Features", "first": 8, "second": 7 },
                    { "name": "Pricing", "first": 6, "second": 8 },
                    { "name": "Support", "first": 8, "second": 7 },
                    { "name": "Integrations", "first": 9, "second": 6 }
                ],
                "recommendation": "Pilot the first product if integrations matter most; otherwise start with the second."
            }),
            Self::PredictDeal => json!({
                "probability": 72,
                "confidence": "medium",
                "estimatedCloseDays": 45,
                "factors": [
                    { "factor": "Stage fit", "impact": "positive" },
                    { "factor": "Budget alignment", "impact": "positive" },
                    { "factor": "Procurement cycle", "impact": "negative" }
                ],
                "nextSteps": [
                    "Schedule a technical deep-dive",
                    "Share two enterprise references",
                    "Propose a 60-day pilot"
                ]
            }),
            Self::GenerateBrief => json!({
                "title": "Executive Brief",
                "summary": "A growth-stage vendor with strong retention and a credible enterprise roadmap.",
                "highlights": [
                    "Net revenue retention above 120%",
                    "SOC 2 Type II certified",
                    "Three Fortune 500 pilots in progress"
                ],
                "risks": ["Small go-to-market team", "Single-region hosting"],
                "recommendation": "Proceed to a scoped pilot."
            }),
            Self::AnalyzePitch => json!({
                "overallScore": 78,
                "strengths": ["Clear problem statement", "Credible founding team"],
                "weaknesses": ["Thin competitive analysis", "Unclear unit economics"],
                "suggestions": [
                    "Quantify the market with bottom-up sizing",
                    "Add a slide on customer acquisition cost"
                ],
                "sections": {
                    "problem": 85,
                    "solution": 80,
                    "market": 70,
                    "traction": 75,
                    "team": 82
                }
            }),
            Self::AnalyzeReview => json!({
                "sentiment": "positive",
                "score": 0.82,
                "themes": ["ease of use", "support quality", "pricing"],
                "summary": "Reviewers praise onboarding and support; some mention pricing at scale.",
                "authenticity": "likely genuine"
            }),
            Self::Transcribe => json!({
                "text": "Thanks for joining the demo. Today we'll walk through onboarding, reporting, and integrations.",
                "language": "en",
                "durationSeconds": 42
            }),
            Self::GenerateLaunchContent => json!({
                "title": "Introducing our AI-powered workflow assistant",
                "tagline": "Ship faster with fewer handoffs",
                "description": "Automate the busywork between teams so everyone can focus on the work that matters.",
                "highlights": [
                    "Set up in minutes",
                    "Works with the tools you already use",
                    "Enterprise-grade security"
                ]
            }),
        }
    }
}

impl fmt::Display for AiFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AiFeature {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.slug() == value)
            .ok_or_else(|| value.to_owned())
    }
}

/// Request body for an AI feature.
#[derive(Clone, PartialEq)]
pub enum AiPayload {
    Json(Value),
    Audio {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl fmt::Debug for AiPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Audio {
                file_name,
                content_type,
                bytes,
            } => f
                .debug_struct("Audio")
                .field("file_name", file_name)
                .field("content_type", content_type)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// Where an AI response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiSource {
    Live,
    Fallback,
}

/// Feature output delivered to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AiResponse {
    pub feature: AiFeature,
    pub body: Value,
    pub source: AiSource,
}

impl AiResponse {
    pub fn live(feature: AiFeature, body: Value) -> Self {
        Self {
            feature,
            body,
            source: AiSource::Live,
        }
    }

    pub fn fallback(feature: AiFeature) -> Self {
        Self {
            feature,
            body: feature.fallback(),
            source: AiSource::Fallback,
        }
    }
}
