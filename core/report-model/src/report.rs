//! FILENAME: core/report-model/src/report.rs
//! A report document: the widgets placed on one canvas.

use serde::{Deserialize, Serialize};

use crate::component::ComponentConfig;
use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

impl ReportConfig {
    pub fn new(components: Vec<ComponentConfig>) -> Self {
        ReportConfig { components }
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn component(&self, id: &str) -> Option<&ComponentConfig> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Replaces the widget with the same id. Returns false if none matched.
    pub fn replace_component(&mut self, component: ComponentConfig) -> bool {
        match self.components.iter_mut().find(|c| c.id == component.id) {
            Some(slot) => {
                *slot = component;
                true
            }
            None => false,
        }
    }
}
