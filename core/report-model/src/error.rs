//! FILENAME: core/report-model/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Component condition requires both componentId and componentField")]
    MissingComponentReference,

    #[error("Fixed component condition on '{0}' has no target value")]
    MissingTargetValue(String),

    #[error("Fixed component condition on '{0}' reads its target from a datasource but names no field")]
    MissingTargetValueField(String),
}
