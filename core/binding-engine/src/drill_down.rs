//! FILENAME: core/binding-engine/src/drill_down.rs
//! Drill-Down State Machine - per-widget level stack and its filters.
//!
//! States are levels 0..=3. Descending stores the clicked value for the next
//! level, ascending drops the value of the current level. Transitions return
//! a new `DrillDownState`; a rejected transition leaves the caller's state
//! untouched. Filters are cumulative: at level N the query is narrowed by the
//! values of levels 1..=N.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use report_model::{log_debug, log_info};
use report_model::{ComponentConfig, DrillDownConfig, DrillDownState, DrillType, Filter, MAX_DRILL_DEPTH};

/// Why a transition was not applied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillRejection {
    #[error("drill-down is not enabled")]
    Disabled,
    #[error("drill-down type does not narrow this widget")]
    NotSelfDrill,
    #[error("already at the deepest level")]
    MaxDepth,
    #[error("no dimension configured for level {0}")]
    MissingDimension(u8),
    #[error("clicked value is empty")]
    EmptyValue,
    #[error("already at the top level")]
    AtRoot,
}

/// One entry of the drill path, for breadcrumb display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub level: u8,
    pub dimension: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, Copy)]
pub struct DrillDownMachine<'a> {
    config: Option<&'a DrillDownConfig>,
    max_depth: u8,
}

impl<'a> DrillDownMachine<'a> {
    pub fn new(config: Option<&'a DrillDownConfig>) -> Self {
        DrillDownMachine {
            config,
            max_depth: MAX_DRILL_DEPTH,
        }
    }

    pub fn for_component(widget: &'a ComponentConfig) -> Self {
        DrillDownMachine::new(widget.drill_config())
    }

    /// Lowers the maximum depth. Values above 3 are clamped.
    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth.min(MAX_DRILL_DEPTH);
        self
    }

    fn self_drill_config(&self) -> Option<&'a DrillDownConfig> {
        self.config.filter(|c| c.is_self_drill())
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Enters the next level with `clicked` as its value.
    pub fn descend(
        &self,
        state: &DrillDownState,
        clicked: Value,
    ) -> Result<DrillDownState, DrillRejection> {
        let config = match self.config {
            Some(config) if config.enabled => config,
            _ => return Err(self.reject(DrillRejection::Disabled)),
        };
        if config.drill_type != DrillType::SelfDrill {
            return Err(self.reject(DrillRejection::NotSelfDrill));
        }

        let next = state.level.saturating_add(1);
        if next > self.max_depth {
            return Err(self.reject(DrillRejection::MaxDepth));
        }
        if config.dimensions.get(next).is_none() {
            return Err(self.reject(DrillRejection::MissingDimension(next)));
        }
        if clicked.is_null() {
            return Err(self.reject(DrillRejection::EmptyValue));
        }

        let mut updated = state.clone();
        updated.values.set(next, clicked);
        for stale in (next + 1)..=MAX_DRILL_DEPTH {
            updated.values.clear(stale);
        }
        updated.level = next;

        log_debug!("DRILL", "descend {} -> {}", state.level, updated.level);
        Ok(updated)
    }

    /// Leaves the current level, dropping its value.
    pub fn ascend(&self, state: &DrillDownState) -> Result<DrillDownState, DrillRejection> {
        if state.level == 0 {
            return Err(self.reject(DrillRejection::AtRoot));
        }

        let mut updated = state.clone();
        updated.values.clear(state.level);
        updated.level = state.level - 1;

        log_debug!("DRILL", "ascend {} -> {}", state.level, updated.level);
        Ok(updated)
    }

    /// Back to level 0 with no values, e.g. after the data source changed.
    pub fn reset(&self) -> DrillDownState {
        DrillDownState::default()
    }

    fn reject(&self, reason: DrillRejection) -> DrillRejection {
        log_info!("DRILL", "transition rejected: {}", reason);
        reason
    }

    // ========================================================================
    // DERIVED VALUES
    // ========================================================================

    /// Equality filters for levels 1..=level where both dimension and value are set.
    pub fn filters(&self, state: &DrillDownState) -> Vec<Filter> {
        let config = match self.self_drill_config() {
            Some(config) => config,
            None => return Vec::new(),
        };

        (1..=state.level.min(MAX_DRILL_DEPTH))
            .filter_map(|level| {
                let dimension = config.dimensions.get(level)?;
                let value = state.values.get(level)?;
                Some(Filter::eq(dimension, value.clone()))
            })
            .collect()
    }

    /// Column used as the category axis at the current level. Falls back to
    /// `fallback` (the widget's display field) when no dimension applies.
    pub fn active_dimension(&self, state: &DrillDownState, fallback: Option<&str>) -> Option<String> {
        self.self_drill_config()
            .filter(|_| state.level > 0)
            .and_then(|config| config.dimensions.get(state.level))
            .or(fallback)
            .map(str::to_string)
    }

    pub fn breadcrumbs(&self, state: &DrillDownState) -> Vec<Breadcrumb> {
        (1..=state.level.min(MAX_DRILL_DEPTH))
            .filter_map(|level| {
                let value = state.values.get(level)?.clone();
                Some(Breadcrumb {
                    level,
                    dimension: self
                        .config
                        .and_then(|c| c.dimensions.get(level))
                        .map(str::to_string),
                    value,
                })
            })
            .collect()
    }
}

// ============================================================================
// WIDGET UPDATES
// ============================================================================

/// Returns a copy of `widget` one level deeper, drilled into `clicked`.
pub fn descend_component(
    widget: &ComponentConfig,
    clicked: Value,
    max_depth: u8,
) -> Result<ComponentConfig, DrillRejection> {
    let machine = DrillDownMachine::for_component(widget).with_max_depth(max_depth);
    let state = machine.descend(&widget.drill_state(), clicked)?;
    Ok(widget.with_drill_state(&state))
}

pub fn ascend_component(widget: &ComponentConfig) -> Result<ComponentConfig, DrillRejection> {
    let state = DrillDownMachine::for_component(widget).ascend(&widget.drill_state())?;
    Ok(widget.with_drill_state(&state))
}

/// Returns a copy of `widget` back at the top level.
pub fn reset_component(widget: &ComponentConfig) -> ComponentConfig {
    widget.with_drill_state(&DrillDownMachine::for_component(widget).reset())
}
