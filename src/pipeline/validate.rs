// Input validation — pure field checks, errors accumulate.
//
// Both fields are checked independently so a request can collect errors for
// each in one round trip. No network or state access.

use std::sync::OnceLock;

use regex_lite::Regex;

use super::ModerationRequest;

/// Image formats the vision providers accept.
pub const SUPPORTED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// A valid base64 payload contains only these characters, with optional
/// trailing `=` padding.
fn base64_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+/\n\r]+=*$").expect("base64 pattern is valid")
    })
}

/// Check a request, returning every problem found (empty = valid).
pub fn validate(request: &ModerationRequest) -> Vec<String> {
    let mut errors = Vec::new();

    match request.image.as_deref() {
        None => errors.push(r#"Missing required field: "image""#.to_string()),
        Some(image) if image.trim().is_empty() => {
            errors.push(r#""image" must be a non-empty base64-encoded string"#.to_string());
        }
        Some(image) if !base64_shape().is_match(image) => {
            errors.push(r#""image" contains invalid base64 characters"#.to_string());
        }
        Some(_) => {}
    }

    match request.mime_type.as_deref() {
        None => errors.push(r#"Missing required field: "mimeType""#.to_string()),
        Some(mime) if !SUPPORTED_MIME_TYPES.contains(&mime) => {
            errors.push(format!(
                "Unsupported mimeType \"{mime}\". Must be one of: {}",
                SUPPORTED_MIME_TYPES.join(", ")
            ));
        }
        Some(_) => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(image: Option<&str>, mime_type: Option<&str>) -> ModerationRequest {
        ModerationRequest {
            image: image.map(str::to_string),
            mime_type: mime_type.map(str::to_string),
        }
    }

    #[test]
    fn valid_request_has_no_errors() {
        let errors = validate(&request(Some("aGVsbG8="), Some("image/png")));
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_fields_are_both_reported() {
        let errors = validate(&request(None, None));

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("\"image\""));
        assert!(errors[1].contains("\"mimeType\""));
    }

    #[test]
    fn blank_image_is_rejected() {
        let errors = validate(&request(Some("   "), Some("image/jpeg")));

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("non-empty base64-encoded string"));
    }

    #[test]
    fn invalid_base64_characters_are_rejected() {
        let errors = validate(&request(Some("not base64!!"), Some("image/jpeg")));

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("invalid base64 characters"));
    }

    #[test]
    fn padding_and_line_breaks_are_allowed() {
        let errors = validate(&request(Some("aGVs\r\nbG8="), Some("image/gif")));
        assert!(errors.is_empty());
    }

    #[test]
    fn unsupported_mime_type_enumerates_the_supported_set() {
        let errors = validate(&request(Some("aGVsbG8="), Some("image/tiff")));

        assert_eq!(errors.len(), 1);
        for mime in SUPPORTED_MIME_TYPES {
            assert!(errors[0].contains(mime), "missing {mime} in: {}", errors[0]);
        }
    }

    #[test]
    fn image_and_mime_errors_can_co_occur() {
        let errors = validate(&request(Some("näh"), Some("text/plain")));

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("invalid base64 characters"));
        assert!(errors[1].contains("Unsupported mimeType"));
    }
}
