//! FILENAME: core/report-model/src/lib.rs
//! Shared report, widget and query types for the dashboard binding engine.
//!
//! Everything here is plain serializable data in the canvas's JSON
//! shape. Resolution logic lives in `binding-engine`, data access in
//! `data-service`.

pub mod component;
pub mod condition;
pub mod data_source;
pub mod drill;
pub mod error;
pub mod logging;
pub mod query;
pub mod report;
pub mod value;

// Re-export commonly used types at the crate root
pub use component::{
    ComponentConfig, ComponentId, ComponentType, InteractionConfig, Props,
    PROP_DRILL_DOWN_STATE, PROP_SELECTED_NODE_PATH, PROP_VALUE,
};
pub use condition::{
    ComponentMatch, ComponentOperand, ConditionOperand, ConditionOperator, DataSourceCondition,
    Filter, TargetValueSource,
};
pub use data_source::{
    ConditionalDataSource, DataSourceConfig, DatasetId, FieldMapping, LogicOperator, SourceKind,
    SourceOrigin, SourceRef,
};
pub use drill::{
    DrillDimensions, DrillDownConfig, DrillDownState, DrillType, DrillValues, MAX_DRILL_DEPTH,
};
pub use error::ModelError;
pub use query::{QueryRequest, QueryResponse, Row};
pub use report::ReportConfig;
