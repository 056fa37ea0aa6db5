//! CLI command implementations.

pub mod calibrate;
pub mod template;
pub mod validate;

pub use calibrate::CalibrateArgs;
pub use template::TemplateArgs;
pub use validate::ValidateArgs;

use std::path::Path;

use anyhow::{Context, Result};
use multicurve_config::ProblemDefinition;

/// Reads a TOML or JSON problem file.
pub fn load(path: &Path) -> Result<ProblemDefinition> {
    ProblemDefinition::from_path(path)
        .with_context(|| format!("Failed to load problem file {}", path.display()))
}
