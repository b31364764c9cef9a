//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{EstraiError, Result};

/// Main configuration for the estrai pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstraiConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Local field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Text-to-JSON assistant configuration.
    pub assistant: AssistantConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum number of visible characters for a PDF to count as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 1 }
    }
}

/// Local extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Prefer check-digit-valid partita IVA among unlabelled candidates.
    pub validate_tax_id: bool,

    /// Lines scanned for an amount, counting the label line itself.
    pub window_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_tax_id: true,
            window_lines: 3,
        }
    }
}

/// Assistant (chat-completions API) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Call the assistant for fields left empty by local extraction.
    pub enabled: bool,

    /// Chat-completions endpoint.
    pub endpoint: String,

    /// Model name.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum characters of document text sent with a request.
    pub max_snippet_chars: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            max_snippet_chars: 18_000,
        }
    }
}

impl EstraiConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| EstraiError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EstraiConfig =
            serde_json::from_str(r#"{"assistant": {"model": "gpt-4o"}}"#).unwrap();
        assert_eq!(config.assistant.model, "gpt-4o");
        assert_eq!(config.assistant.max_snippet_chars, 18_000);
        assert_eq!(config.extraction.window_lines, 3);
        assert!(config.extraction.validate_tax_id);
    }

    #[test]
    fn test_invalid_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"window_lines": "three"}}"#).unwrap();

        let err = EstraiConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, EstraiError::Config(_)));
        assert_eq!(err.class(), crate::error::ErrorClass::Internal);

        let missing = EstraiConfig::from_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, EstraiError::Io(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = EstraiConfig::default();
        config.assistant.model = "gpt-4o".to_string();
        config.save(&path).unwrap();

        let loaded = EstraiConfig::from_file(&path).unwrap();
        assert_eq!(loaded.assistant.model, "gpt-4o");
    }
}
