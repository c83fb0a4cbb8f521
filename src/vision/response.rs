// Provider reply parsing — shared by all backends.
//
// Backends are instructed to reply with bare JSON, but models sometimes
// wrap the payload in a markdown code fence anyway. Strip the fence, then
// parse. A parse failure here is AnalysisError::Parse — the caller must be
// able to tell "the provider answered with garbage" apart from "the call
// to the provider failed".

use super::traits::{AnalysisError, VisionAnalysis};

/// Parse a raw textual reply into a VisionAnalysis.
pub fn parse_analysis(raw: &str) -> Result<VisionAnalysis, AnalysisError> {
    Ok(serde_json::from_str(strip_code_fence(raw))?)
}

/// Remove a leading ``` or ```json fence and a trailing ``` if present.
/// The language tag is matched case-insensitively.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.trim_start();

    match rest.strip_suffix("```") {
        Some(body) => body.trim_end(),
        None => rest,
    }
}
