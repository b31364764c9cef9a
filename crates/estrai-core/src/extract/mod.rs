//! Field extraction: local rules, the statement figure locator, and the
//! merge with assistant replies.

pub mod merge;
mod orchestrator;
pub mod rules;
pub mod statement;

pub use merge::{merge, Chain, Resolved};
pub use orchestrator::Extractor;
pub use statement::{locate_revenue, locate_total_assets, FigureLocator};
