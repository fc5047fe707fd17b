//! Engine and frontend configuration.
//!
//! Loaded from a TOML file; every field has a default, so an empty file is
//! a valid configuration.
//!
//! ```toml
//! width = 256
//! height = 256
//! default_rule = "life"
//! brush_radius = 3
//! frames_per_second = 30
//! step_mode = { kind = "row_tasks", band = 32 }
//!
//! [rules]
//! mylife = "B36/S235"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_RULE;
use crate::error::ConfigError;
use crate::grid::DEFAULT_SIZE;
use crate::rows::StepMode;
use crate::rule::RuleSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutomatonConfig {
    /// Grid width in cells. Fixed for the lifetime of the engine.
    pub width: usize,

    /// Grid height in cells.
    pub height: usize,

    /// Rule selected at startup. Must name a built-in or custom rule.
    pub default_rule: String,

    /// Half-width of the square paint brush, in cells.
    ///
    /// A radius of 0 paints a single cell; the viewer lets the scroll wheel
    /// change it at runtime.
    pub brush_radius: u32,

    /// Target frame rate of the run loop. One frame advances at most one
    /// generation.
    pub frames_per_second: u32,

    pub step_mode: StepMode,

    /// Extra named rules added to the catalog, as rule strings.
    pub rules: BTreeMap<String, RuleSpec>,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            default_rule: DEFAULT_RULE.to_string(),
            brush_radius: 5,
            frames_per_second: 60,
            step_mode: StepMode::Sequential,
            rules: BTreeMap::new(),
        }
    }
}

impl AutomatonConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.frames_per_second == 0 {
            return Err(ConfigError::Invalid("frames_per_second must be positive".into()));
        }

        if let StepMode::RowTasks { band: 0 } = self.step_mode {
            return Err(ConfigError::Invalid("row task band must be at least 1".into()));
        }

        if self.default_rule.is_empty() {
            return Err(ConfigError::Invalid("default_rule must not be empty".into()));
        }

        Ok(())
    }
}
