//! Prompt system for physrag.
//!
//! This crate provides:
//! - The five instruction templates keyed by task type
//! - Optional per-workspace template overrides (`.physrag/prompts.yaml`)
//! - Handlebars rendering of the user payload, including the reset notice

pub mod builder;
pub mod loader;
pub mod templates;
pub mod types;

// Re-export main types
pub use builder::{PromptComposer, RESET_NOTICE};
pub use loader::load_templates;
pub use types::{BuiltPrompt, BuiltPromptMetadata, TemplateOverrides, TemplateSet};
