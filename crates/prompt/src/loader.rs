//! Loader for instruction template overrides.

use crate::types::{TemplateOverrides, TemplateSet};
use physrag_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Path of the optional override file inside a workspace.
pub fn overrides_path(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".physrag").join("prompts.yaml")
}

/// Load the instruction templates for a workspace.
///
/// Starts from the built-in set and replaces any template named in
/// `.physrag/prompts.yaml`. A missing file yields the built-in set.
///
/// # Example
/// ```no_run
/// use physrag_prompt::load_templates;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let templates = load_templates(Path::new("."))?;
/// println!("{}", templates.general);
/// # Ok(())
/// # }
/// ```
pub fn load_templates(workspace_path: &Path) -> AppResult<TemplateSet> {
    let path = overrides_path(workspace_path);

    if !path.exists() {
        tracing::debug!("No template overrides at {:?}, using built-in templates", path);
        return Ok(TemplateSet::default());
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        AppError::Prompt(format!("Failed to read template overrides {:?}: {}", path, e))
    })?;

    let overrides: TemplateOverrides = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse template overrides {:?}: {}",
            path, e
        ))
    })?;

    let templates = apply_overrides(TemplateSet::default(), overrides)?;
    tracing::info!("Loaded template overrides from {:?}", path);

    Ok(templates)
}

/// Replace the templates named in `overrides`.
fn apply_overrides(mut set: TemplateSet, overrides: TemplateOverrides) -> AppResult<TemplateSet> {
    let slots = [
        ("measurement", overrides.measurement, &mut set.measurement),
        ("formula", overrides.formula, &mut set.formula),
        ("comparison", overrides.comparison, &mut set.comparison),
        ("theory", overrides.theory, &mut set.theory),
        ("general", overrides.general, &mut set.general),
    ];

    for (name, replacement, slot) in slots {
        if let Some(text) = replacement {
            if text.trim().is_empty() {
                return Err(AppError::Prompt(format!(
                    "Template override '{}' cannot be empty",
                    name
                )));
            }
            *slot = text;
        }
    }

    Ok(set)
}
