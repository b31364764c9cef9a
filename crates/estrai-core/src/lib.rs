//! Core library for Italian business document extraction.
//!
//! This crate provides:
//! - PDF text-layer reading
//! - Italian amount parsing and formatting
//! - The financial-statement figure locator (revenue, total assets)
//! - Registry extract, tax return and VAT return field rules
//! - A text-to-JSON assistant client for fields the rules miss

pub mod assistant;
pub mod document;
pub mod error;
pub mod extract;
pub mod models;
pub mod pdf;

pub use assistant::{Assistant, AssistantRequest, MockAssistant, MockReply, OpenAiAssistant};
pub use document::Document;
pub use error::{AssistantError, ErrorClass, EstraiError, PdfError, Result};
pub use extract::Extractor;
pub use models::config::EstraiConfig;
pub use models::kind::{DocumentKind, Field};
pub use models::record::{ExtractionResult, LegalFormKind, Shareholder, ShareholderKind};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
