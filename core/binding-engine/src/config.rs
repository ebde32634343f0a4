//! FILENAME: core/binding-engine/src/config.rs

use serde::{Deserialize, Serialize};

use report_model::MAX_DRILL_DEPTH;

use crate::error::BindingError;

/// Settings shared by every widget binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page size sent with every query; `None` leaves it to the data service.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Deepest drill level allowed (at most 3).
    pub max_drill_depth: u8,
    /// Log configuration issues each time a widget is resolved.
    pub validate_on_resolve: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            limit: None,
            offset: None,
            max_drill_depth: MAX_DRILL_DEPTH,
            validate_on_resolve: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, BindingError> {
        let mut config: EngineConfig = serde_json::from_str(text)?;
        config.max_drill_depth = config.max_drill_depth.min(MAX_DRILL_DEPTH);
        Ok(config)
    }
}
