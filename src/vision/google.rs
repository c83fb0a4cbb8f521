// Google Gemini implementation.
//
// Uses the Generative Language REST API with the key passed as a query
// parameter. Same instructions as the Claude backend, same strict-JSON
// reply contract, same shared parse path.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::response;
use super::traits::{AnalysisError, VisionAnalysis, VisionAnalyzer};
use super::{ANALYSIS_INSTRUCTIONS, ANALYSIS_REQUEST};

const MODEL: &str = "gemini-2.0-flash";

/// Gemini vision analyzer.
pub struct GeminiAnalyzer {
    client: Client,
    api_key: String,
}

impl GeminiAnalyzer {
    /// Create a new analyzer with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl VisionAnalyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        base64_image: &str,
        mime_type: &str,
    ) -> Result<VisionAnalysis, AnalysisError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent?key={}",
            self.api_key
        );

        let request = GenerateRequest {
            system_instruction: Instruction {
                parts: vec![Part::text(ANALYSIS_INSTRUCTIONS)],
            },
            contents: vec![Content {
                parts: vec![
                    Part::inline_data(mime_type, base64_image),
                    Part::text(ANALYSIS_REQUEST),
                ],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Upstream(format!(
                "Gemini API returned {status}: {body}"
            )));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Upstream(format!("malformed Gemini API envelope: {e}")))?;

        let raw = reply
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|part| part.text.as_deref())
            .ok_or_else(|| {
                AnalysisError::Upstream("Gemini reply contained no text part".to_string())
            })?;

        debug!(reply_len = raw.len(), "Gemini reply received");

        response::parse_analysis(raw)
    }
}

// --- Generative Language API request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Instruction<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

impl<'a> Part<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &'a str, data: &'a str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData { mime_type, data }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}
