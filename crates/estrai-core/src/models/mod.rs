//! Data models: extraction record, document kinds, configuration.

pub mod config;
pub mod kind;
pub mod record;
