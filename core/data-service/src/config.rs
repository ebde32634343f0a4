//! FILENAME: core/data-service/src/config.rs

use serde::{Deserialize, Serialize};

/// Paging defaults applied when a request leaves limit/offset unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryConfig {
    pub default_limit: u32,
    pub default_offset: u32,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        InMemoryConfig {
            default_limit: 100,
            default_offset: 0,
        }
    }
}
