//! Manual-entry category buttons.

use crate::domain::Operation;
use serde::{Deserialize, Serialize};

/// A user-managed button that pre-fills label and operation for manual entries.
///
/// `color` is presentation metadata and never read by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    pub operation: Operation,
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        operation: Operation,
        color: impl Into<String>,
    ) -> Self {
        Category {
            id: id.into(),
            label: label.into(),
            operation,
            color: color.into(),
        }
    }
}
