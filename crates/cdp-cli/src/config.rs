//! Pipeline option loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cdp_normalization::PipelineOptions;

/// Defaults, overridden by the JSON file at `path` when given.
pub fn load_options(path: Option<&Path>) -> Result<PipelineOptions> {
    let Some(path) = path else {
        return Ok(PipelineOptions::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("read pipeline options {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parse pipeline options {}", path.display()))
}
