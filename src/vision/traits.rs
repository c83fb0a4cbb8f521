// Vision analyzer trait — the swap-ready abstraction.
//
// Implementations serialize the image into a provider-specific request,
// demand a strict JSON-only reply, and hand the raw text to the shared
// parser. The two failure kinds are deliberately distinct: a provider that
// answered with garbage is a different problem than a provider that never
// answered, even though both surface as 502s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an image analysis call can fail.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The call to the provider failed — timeout, auth, rate limit, network,
    /// or a reply with no usable text.
    #[error("{0}")]
    Upstream(String),
    /// The provider replied, but the payload was not valid JSON after
    /// fence-stripping.
    #[error("unparseable provider reply: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a backend reports about one image, parsed from its JSON reply.
///
/// Every field is optional — providers are instructed to fill them all, but
/// the pipeline defaults what is missing via `normalized_text` and
/// `copyright_check` instead of trusting the model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionAnalysis {
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub copyright_assessment: Option<CopyrightAssessment>,
}

/// The raw copyright block as the provider wrote it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopyrightAssessment {
    #[serde(default)]
    pub flagged: Option<bool>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Copyright-risk confidence reported in the final verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Map a provider-reported string onto the enum. Anything unrecognized
    /// collapses to Low rather than failing the whole analysis.
    fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "medium" => Confidence::Medium,
            "high" => Confidence::High,
            _ => Confidence::Low,
        }
    }
}

/// The copyright half of the moderation verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyrightCheck {
    pub flagged: bool,
    pub confidence: Confidence,
    pub reasoning: String,
}

impl Default for CopyrightCheck {
    fn default() -> Self {
        Self {
            flagged: false,
            confidence: Confidence::Low,
            reasoning: String::new(),
        }
    }
}

impl VisionAnalysis {
    /// Extracted text with empty strings collapsed to None.
    pub fn normalized_text(&self) -> Option<String> {
        self.extracted_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Copyright assessment with every missing field defaulted.
    pub fn copyright_check(&self) -> CopyrightCheck {
        let raw = self.copyright_assessment.as_ref();

        CopyrightCheck {
            flagged: raw.and_then(|c| c.flagged).unwrap_or(false),
            confidence: raw
                .and_then(|c| c.confidence.as_deref())
                .map(Confidence::parse)
                .unwrap_or_default(),
            reasoning: raw.and_then(|c| c.reasoning.clone()).unwrap_or_default(),
        }
    }
}

/// Trait for image analysis backends. Implementations must be async because
/// every provider is an HTTP API call.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Analyze one base64-encoded image: extract visible text and assess
    /// copyright risk. A single attempt — retries, if any, belong to the
    /// provider integration, not to callers.
    async fn analyze(
        &self,
        base64_image: &str,
        mime_type: &str,
    ) -> Result<VisionAnalysis, AnalysisError>;
}
