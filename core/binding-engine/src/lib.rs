//! FILENAME: core/binding-engine/src/lib.rs
//! Data-binding resolution for dashboard widgets.
//!
//! Decides, per widget and per render, which dataset/table to query, with
//! which filters, and whether a new query is needed at all. Data access goes
//! through the `data-service` traits; configuration types come from
//! `report-model`.
//!
//! Layers:
//! - `condition`: Condition evaluation and AND/OR combination
//! - `value_resolver`: Current values of peer widgets (pull-based)
//! - `source_resolver`: First-match selection among conditional sources
//! - `drill_down`: Per-widget drill level state machine and its filters
//! - `fingerprint`: Deterministic refetch keys
//! - `orchestrator`: Query construction and the fetch lifecycle
//! - `view`: What a widget renders (`BindingStatus`, `ChartData`)
//! - `validation`: Configuration issues, reported but not enforced

pub mod condition;
pub mod config;
pub mod drill_down;
pub mod error;
pub mod fingerprint;
pub mod orchestrator;
pub mod source_resolver;
pub mod validation;
pub mod value_resolver;
pub mod view;

pub use condition::{combine, compare, evaluate};
pub use config::EngineConfig;
pub use drill_down::{
    ascend_component, descend_component, reset_component, Breadcrumb, DrillDownMachine,
    DrillRejection,
};
pub use error::BindingError;
pub use fingerprint::{compute_fingerprint, dependency_values, should_refetch, Fingerprint};
pub use orchestrator::{
    build_query, BindingOrchestrator, FetchOutcome, PendingFetch, PreparedQuery,
    RefetchDecision, TableWriteBack,
};
pub use source_resolver::{resolve_source, source_matches, ResolvedSource};
pub use validation::{validate_component, validate_report, ConfigIssue};
pub use value_resolver::{resolve_operand, ComponentValues, ValueResolver};
pub use view::{BindingStatus, ChartData};
