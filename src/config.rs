use std::env;

use anyhow::{Context, Result};

/// Which vision analysis backend to use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisionBackend {
    /// Anthropic Claude (default) — requires ANTHROPIC_API_KEY
    Claude,
    /// Google Gemini — requires GOOGLE_CLOUD_API_KEY
    Google,
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Which vision provider to use (default: Claude)
    pub vision_backend: VisionBackend,
    pub anthropic_api_key: String,
    pub google_api_key: String,
    /// Newline-delimited profanity vocabulary, read once at startup
    pub terms_path: String,
    /// Default listen port (PORT env var; `serve --port` overrides)
    pub port: u16,
    /// Serve the embedded browser test page at / (PUMICE_TEST_MODE)
    pub test_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// An unrecognized VISION_PROVIDER is a hard error here — provider
    /// selection happens exactly once, before the server starts serving.
    pub fn load() -> Result<Self> {
        let vision_backend = match env::var("VISION_PROVIDER") {
            Ok(raw) => match raw.to_lowercase().as_str() {
                "claude" => VisionBackend::Claude,
                "google" => VisionBackend::Google,
                _ => anyhow::bail!(
                    "Invalid VISION_PROVIDER \"{raw}\". Must be one of: claude, google"
                ),
            },
            Err(_) => VisionBackend::Claude,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid PORT \"{raw}\""))?,
            Err(_) => 8080,
        };

        Ok(Self {
            vision_backend,
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            google_api_key: env::var("GOOGLE_CLOUD_API_KEY").unwrap_or_default(),
            terms_path: env::var("PUMICE_TERMS_PATH")
                .unwrap_or_else(|_| "./profanity.txt".to_string()),
            port,
            test_mode: env::var("PUMICE_TEST_MODE")
                .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
        })
    }

    /// Check that the selected vision backend has its credential configured.
    /// Call this before serving — a missing key must fail startup, never
    /// surface as a per-request error.
    pub fn require_vision(&self) -> Result<()> {
        match self.vision_backend {
            VisionBackend::Claude if self.anthropic_api_key.is_empty() => {
                anyhow::bail!(
                    "ANTHROPIC_API_KEY not set. Add it to your .env file.\n\
                     See .env.example for the required variables."
                )
            }
            VisionBackend::Google if self.google_api_key.is_empty() => {
                anyhow::bail!(
                    "VISION_PROVIDER is \"google\" but GOOGLE_CLOUD_API_KEY is not set.\n\
                     See .env.example for the required variables."
                )
            }
            _ => Ok(()),
        }
    }
}
