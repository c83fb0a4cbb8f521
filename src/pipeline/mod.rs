// Moderation pipeline — the decision core.
//
// One pass per request: validate -> analyze -> normalize -> profanity check
// -> compose verdict. The provider call is the only step that touches the
// network; everything else is pure. No retries — a single attempt, success
// or terminal failure.

pub mod validate;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::profanity::matcher::{self, ProfanityCheck};
use crate::profanity::store::TermList;
use crate::vision::traits::{AnalysisError, CopyrightCheck, VisionAnalyzer};

/// One inbound moderation request. Fields are optional at the type level so
/// missing fields reach the validator as errors instead of failing
/// deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// The overall verdict. "fail" is a content outcome, not a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// The single response artifact, fully determined by the sub-results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationResponse {
    pub status: Verdict,
    pub extracted_text: Option<String>,
    pub profanity_check: ProfanityCheck,
    pub copyright_check: CopyrightCheck,
    pub errors: Vec<String>,
}

impl ModerationResponse {
    /// Terminal failure shape: neutral sub-results, the given error list.
    /// Sub-results are never left undefined or mixed with partial data.
    fn failed(errors: Vec<String>) -> Self {
        Self {
            status: Verdict::Fail,
            extracted_text: None,
            profanity_check: ProfanityCheck::default(),
            copyright_check: CopyrightCheck::default(),
            errors,
        }
    }
}

/// How the pipeline terminated. The web layer maps these onto HTTP classes;
/// the pipeline itself knows nothing about status codes.
#[derive(Debug)]
pub enum Outcome {
    /// Input validation failed — client error.
    Rejected(ModerationResponse),
    /// The provider call failed — upstream error.
    ProviderFailed(ModerationResponse),
    /// The pipeline ran to completion; the verdict may still be "fail".
    Completed(ModerationResponse),
}

/// Run one request through the pipeline.
pub async fn moderate(
    request: &ModerationRequest,
    vision: &dyn VisionAnalyzer,
    terms: &TermList,
) -> Outcome {
    let errors = validate::validate(request);
    if !errors.is_empty() {
        return Outcome::Rejected(ModerationResponse::failed(errors));
    }

    // Validation guarantees both fields are present
    let image = request.image.as_deref().unwrap_or_default();
    let mime_type = request.mime_type.as_deref().unwrap_or_default();

    let analysis = match vision.analyze(image, mime_type).await {
        Ok(analysis) => analysis,
        Err(e) => {
            error!(error = %e, "Image analysis failed");

            let message = match &e {
                AnalysisError::Parse(_) => "Failed to parse AI response".to_string(),
                AnalysisError::Upstream(msg) => format!("Upstream AI service error: {msg}"),
            };
            return Outcome::ProviderFailed(ModerationResponse::failed(vec![message]));
        }
    };

    let extracted_text = analysis.normalized_text();
    let copyright_check = analysis.copyright_check();

    let profanity_check = matcher::check(terms, extracted_text.as_deref());

    let status = if profanity_check.flagged || copyright_check.flagged {
        Verdict::Fail
    } else {
        Verdict::Pass
    };

    Outcome::Completed(ModerationResponse {
        status,
        extracted_text,
        profanity_check,
        copyright_check,
        errors: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::response::parse_analysis;
    use crate::vision::traits::{CopyrightAssessment, VisionAnalysis};
    use async_trait::async_trait;

    /// Scripted analyzer standing in for a real provider.
    enum StubAnalyzer {
        Succeed(VisionAnalysis),
        FailUpstream(&'static str),
        FailParse,
    }

    #[async_trait]
    impl VisionAnalyzer for StubAnalyzer {
        async fn analyze(
            &self,
            _base64_image: &str,
            _mime_type: &str,
        ) -> Result<VisionAnalysis, AnalysisError> {
            match self {
                StubAnalyzer::Succeed(analysis) => Ok(analysis.clone()),
                StubAnalyzer::FailUpstream(msg) => Err(AnalysisError::Upstream(msg.to_string())),
                StubAnalyzer::FailParse => parse_analysis("not json"),
            }
        }
    }

    fn terms(list: &[&str]) -> TermList {
        TermList::from_lines(list.iter().copied()).unwrap()
    }

    fn request() -> ModerationRequest {
        ModerationRequest {
            image: Some("aGVsbG8=".to_string()),
            mime_type: Some("image/jpeg".to_string()),
        }
    }

    fn analysis(text: Option<&str>, flagged: bool) -> VisionAnalysis {
        VisionAnalysis {
            extracted_text: text.map(str::to_string),
            copyright_assessment: Some(CopyrightAssessment {
                flagged: Some(flagged),
                confidence: Some("high".to_string()),
                reasoning: Some("test".to_string()),
            }),
        }
    }

    #[tokio::test]
    async fn clean_image_passes() {
        let stub = StubAnalyzer::Succeed(analysis(Some("Hello world"), false));
        let outcome = moderate(&request(), &stub, &terms(&["damn"])).await;

        let Outcome::Completed(response) = outcome else {
            panic!("expected Completed, got {outcome:?}");
        };
        assert_eq!(response.status, Verdict::Pass);
        assert_eq!(response.extracted_text.as_deref(), Some("Hello world"));
        assert!(response.errors.is_empty());
    }

    #[tokio::test]
    async fn copyright_flag_fails_even_without_text() {
        let stub = StubAnalyzer::Succeed(analysis(None, true));
        let outcome = moderate(&request(), &stub, &terms(&["damn"])).await;

        let Outcome::Completed(response) = outcome else {
            panic!("expected Completed, got {outcome:?}");
        };
        assert_eq!(response.status, Verdict::Fail);
        assert!(response.copyright_check.flagged);
        assert!(!response.profanity_check.flagged);
        assert_eq!(response.extracted_text, None);
    }

    #[tokio::test]
    async fn profanity_in_extracted_text_fails() {
        let stub = StubAnalyzer::Succeed(analysis(Some("well, damn."), false));
        let outcome = moderate(&request(), &stub, &terms(&["damn"])).await;

        let Outcome::Completed(response) = outcome else {
            panic!("expected Completed, got {outcome:?}");
        };
        assert_eq!(response.status, Verdict::Fail);
        assert_eq!(response.profanity_check.matches, vec!["damn"]);
    }

    #[tokio::test]
    async fn upstream_failure_embeds_the_cause() {
        let stub = StubAnalyzer::FailUpstream("timeout");
        let outcome = moderate(&request(), &stub, &terms(&["damn"])).await;

        let Outcome::ProviderFailed(response) = outcome else {
            panic!("expected ProviderFailed, got {outcome:?}");
        };
        assert_eq!(response.errors, vec!["Upstream AI service error: timeout"]);
        assert_eq!(response.extracted_text, None);
        assert!(!response.profanity_check.flagged);
        assert!(!response.copyright_check.flagged);
    }

    #[tokio::test]
    async fn parse_failure_is_distinct_from_upstream_failure() {
        let stub = StubAnalyzer::FailParse;
        let outcome = moderate(&request(), &stub, &terms(&["damn"])).await;

        let Outcome::ProviderFailed(response) = outcome else {
            panic!("expected ProviderFailed, got {outcome:?}");
        };
        assert_eq!(response.errors, vec!["Failed to parse AI response"]);
        assert_ne!(response.errors[0], "Upstream AI service error: timeout");
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_the_provider() {
        // A stub that would fail loudly if called
        let stub = StubAnalyzer::FailUpstream("should not be called");
        let bad = ModerationRequest {
            image: None,
            mime_type: Some("image/bmp".to_string()),
        };

        let outcome = moderate(&bad, &stub, &terms(&["damn"])).await;

        let Outcome::Rejected(response) = outcome else {
            panic!("expected Rejected, got {outcome:?}");
        };
        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.status, Verdict::Fail);
    }
}
