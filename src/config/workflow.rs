//! Workflow engine configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound for `max_conflict_retries`.
pub const MAX_CONFLICT_RETRIES_LIMIT: u32 = 50;

/// Workflow engine tuning
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// How many times a transition is re-planned after losing a
    /// compare-and-set race before the request fails.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,

    /// Note stored on revision separator entries. `{version}` is replaced
    /// by the merged revision's version.
    #[serde(default = "default_revision_separator_note")]
    pub revision_separator_note: String,
}

impl WorkflowConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_conflict_retries == 0 || self.max_conflict_retries > MAX_CONFLICT_RETRIES_LIMIT {
            return Err(ValidationError::InvalidConflictRetries {
                got: self.max_conflict_retries,
                max: MAX_CONFLICT_RETRIES_LIMIT,
            });
        }
        if self.revision_separator_note.trim().is_empty() {
            return Err(ValidationError::MissingRequired("WORKFLOW__REVISION_SEPARATOR_NOTE"));
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: default_max_conflict_retries(),
            revision_separator_note: default_revision_separator_note(),
        }
    }
}

fn default_max_conflict_retries() -> u32 {
    5
}

fn default_revision_separator_note() -> String {
    "Revision {version} merged".to_string()
}
