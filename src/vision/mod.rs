// Vision analysis — trait-based abstraction for swappable AI backends.
//
// The VisionAnalyzer trait defines the interface. ClaudeAnalyzer (default)
// talks to the Anthropic Messages API; GeminiAnalyzer talks to Google's
// Generative Language API. Exactly one backend is bound at startup. Both
// demand a strict JSON-only reply and share the same parse path.

pub mod claude;
pub mod google;
pub mod response;
pub mod traits;

/// System-level instructions sent to every backend. The reply must be a
/// bare JSON object with exactly the shape the pipeline expects.
pub(crate) const ANALYSIS_INSTRUCTIONS: &str = "\
You are an image analysis assistant. Analyze the provided image and respond \
with ONLY a valid JSON object — no markdown fences, no commentary.

The JSON must have this exact shape:

{
  \"extractedText\": \"<all visible text in the image, or null if none>\",
  \"copyrightAssessment\": {
    \"flagged\": <true or false>,
    \"confidence\": \"<low | medium | high>\",
    \"reasoning\": \"<brief explanation>\"
  }
}

For extractedText: transcribe every piece of visible text in the image. If \
there is no text at all, set the value to null.

For copyrightAssessment: determine whether the image contains potentially \
copyrighted or licensed content such as brand logos, watermarks, stock photo \
signatures, recognizable artwork, trademarked characters, or celebrity \
likenesses. Set flagged to true if any such content is detected. Set \
confidence to \"low\", \"medium\", or \"high\" based on how certain you are. \
Provide a brief reasoning string explaining your assessment.";

/// The user-turn instruction accompanying the image.
pub(crate) const ANALYSIS_REQUEST: &str = "Analyze this image. Extract all \
visible text and assess it for copyrighted or licensed content. Respond with \
the JSON object only.";
