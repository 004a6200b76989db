//! Physrag Core Library
//!
//! This crate provides the foundational utilities shared by every physrag crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The closed set of question task types

pub mod config;
pub mod error;
pub mod logging;
pub mod task;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use task::TaskType;
