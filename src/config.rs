//! Bootstrap configuration, loaded from `facetmap.toml`.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "facetmap.toml";

/// Configuration for one metamodel bootstrap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetmapConfig {
    /// Treat a non-empty validation report as fatal in the validate command
    #[serde(default)]
    pub strict: bool,

    /// Under `strict`, also fail on warnings (not just errors)
    #[serde(default)]
    pub fail_on_warnings: bool,

    /// Facet factories to drop from the default programming model, by name
    #[serde(default)]
    pub disabled_factories: Vec<String>,
}

impl Default for FacetmapConfig {
    fn default() -> Self {
        Self {
            strict: false,
            fail_on_warnings: false,
            disabled_factories: Vec::new(),
        }
    }
}

impl FacetmapConfig {
    /// Load from an explicit path, or from `facetmap.toml` in the current
    /// directory if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default.to_path_buf()
            }
        };
        let content = fs::read_to_string(&candidate)?;
        let config: Self = toml::from_str(&content)?;
        log::debug!("loaded config from {}", candidate.display());
        Ok(config)
    }

    /// Should this report fail the run, given the configured strictness?
    pub fn report_is_fatal(&self, report: &crate::validation::ValidationReport) -> bool {
        if !self.strict {
            return false;
        }
        report.has_errors() || (self.fail_on_warnings && !report.is_empty())
    }
}
