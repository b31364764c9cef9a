//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use estrai_core::{
    Assistant, DocumentKind, EstraiConfig, EstraiError, ExtractionResult, Extractor,
    OpenAiAssistant,
};

/// `<config dir>/estrai/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("estrai")
        .join("config.json")
}

/// Configuration from `path`, else from the default location, else defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<EstraiConfig> {
    if let Some(path) = path {
        return Ok(EstraiConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(EstraiConfig::from_file(&default_path)?)
    } else {
        Ok(EstraiConfig::default())
    }
}

/// The configured assistant, unless disabled.
///
/// A missing API key disables the assistant with a warning; extraction
/// then runs on local rules only.
pub fn build_assistant(config: &EstraiConfig, no_assistant: bool) -> Option<OpenAiAssistant> {
    if no_assistant || !config.assistant.enabled {
        debug!("Assistant disabled");
        return None;
    }

    match OpenAiAssistant::from_config(&config.assistant) {
        Ok(assistant) => Some(assistant),
        Err(e) => {
            warn!("Assistant unavailable, using local rules only: {}", e);
            None
        }
    }
}

/// Parse the `--kind` argument.
pub fn parse_kind(kind: &str) -> Result<DocumentKind, EstraiError> {
    kind.parse()
}

/// Extract one file: `.pdf` through its text layer, `.txt` as extracted text.
pub async fn extract_file(
    path: &Path,
    kind: DocumentKind,
    extractor: &Extractor,
    assistant: Option<&dyn Assistant>,
) -> Result<ExtractionResult, EstraiError> {
    if !path.is_file() {
        return Err(EstraiError::Input(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            extractor.process_pdf(&data, kind, assistant).await
        }
        "txt" => {
            let text = fs::read_to_string(path)?;
            extractor.process_text(&text, kind, assistant).await
        }
        other => Err(EstraiError::Input(format!(
            "unsupported file format: {:?}",
            other
        ))),
    }
}

/// Whether a path has an extension `extract_file` accepts.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_lowercase().as_str(), "pdf" | "txt"))
}
