//! Shared types, error model, and configuration for PageForge.
//!
//! This crate is the foundation depended on by all other PageForge crates.
//! It provides:
//! - [`PageForgeError`] — the unified error type
//! - Domain types ([`ChatMessage`], [`PageSection`], [`PageRecord`], [`WebsiteRecord`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, GenerationConfig, OpenRouterConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{PageForgeError, Result};
pub use types::{
    ChatMessage, PageRecord, PageSection, Role, STATUS_COMPLETED, WebsiteRecord, content_hash,
};
