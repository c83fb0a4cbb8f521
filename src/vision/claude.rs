// Anthropic Claude implementation.
//
// Sends the image to the Messages API with a system prompt demanding a
// strict JSON-only reply, then feeds the first text block of the answer to
// the shared parser. A non-2xx status, a transport error, or a reply with
// no text block are all upstream failures; only the JSON parse of the text
// block itself can produce a parse failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::response;
use super::traits::{AnalysisError, VisionAnalysis, VisionAnalyzer};
use super::{ANALYSIS_INSTRUCTIONS, ANALYSIS_REQUEST};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-opus-4-6";
const MAX_TOKENS: u32 = 1024;

/// Claude vision analyzer.
pub struct ClaudeAnalyzer {
    client: Client,
    api_key: String,
}

impl ClaudeAnalyzer {
    /// Create a new analyzer with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl VisionAnalyzer for ClaudeAnalyzer {
    async fn analyze(
        &self,
        base64_image: &str,
        mime_type: &str,
    ) -> Result<VisionAnalysis, AnalysisError> {
        let request = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: ANALYSIS_INSTRUCTIONS,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: mime_type,
                            data: base64_image,
                        },
                    },
                    ContentBlock::Text {
                        text: ANALYSIS_REQUEST,
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Upstream(format!(
                "Claude API returned {status}: {body}"
            )));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Upstream(format!("malformed Claude API envelope: {e}")))?;

        let raw = reply
            .content
            .iter()
            .find_map(|block| block.text.as_deref())
            .ok_or_else(|| {
                AnalysisError::Upstream("Claude reply contained no text block".to_string())
            })?;

        debug!(reply_len = raw.len(), "Claude reply received");

        response::parse_analysis(raw)
    }
}

// --- Messages API request/response types ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ReplyBlock>,
}

#[derive(Deserialize)]
struct ReplyBlock {
    #[serde(default)]
    text: Option<String>,
}
