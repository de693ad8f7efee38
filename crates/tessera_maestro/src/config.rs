//! Service configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! global_components = ["RouterLink", "RouterView"]
//! report_parse_errors = true
//!
//! [diagnostics]
//! suggestion = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which diagnostic kinds the backend is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DiagnosticOptions {
    pub semantic: bool,
    pub syntactic: bool,
    pub suggestion: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            semantic: true,
            syntactic: true,
            suggestion: true,
        }
    }
}

/// Options for the language service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ServiceConfig {
    /// Forwarded to the backend on every diagnostics request.
    pub diagnostics: DiagnosticOptions,

    /// Component names registered globally, visible in every template.
    pub global_components: Vec<String>,

    /// Append block parse errors to the diagnostics of a component file.
    pub report_parse_errors: bool,

    /// Mark class names declared by scoped style blocks with `display_with_link`.
    pub scoped_class_links: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            diagnostics: DiagnosticOptions::default(),
            global_components: Vec::new(),
            report_parse_errors: true,
            scoped_class_links: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("loaded configuration from {}", path.display());
        Ok(config)
    }
}
