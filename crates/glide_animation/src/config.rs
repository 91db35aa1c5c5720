//! Animator configuration
//!
//! ```toml
//! enabled = true
//! duration_ms = 400
//! ease = "easeOutCubic"
//! ```

use crate::easing::Easing;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Defaults applied to every request that does not override them
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnimatorConfig {
    /// When false every run finishes on its first frame
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Duration for requests without one
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Easing name for requests without one
    #[serde(default = "default_ease")]
    pub ease: String,
    /// Duration used for zero-length runs and while disabled
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: f64,
}

fn default_true() -> bool {
    true
}

fn default_duration_ms() -> f64 {
    1000.0
}

fn default_ease() -> String {
    "linear".to_string()
}

fn default_min_duration_ms() -> f64 {
    1.0
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_duration_ms(),
            ease: default_ease(),
            min_duration_ms: default_min_duration_ms(),
        }
    }
}

impl AnimatorConfig {
    /// Parse from TOML; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The configured default easing; unknown names fall back to linear
    pub fn easing(&self) -> Easing {
        Easing::named(&self.ease)
    }
}
