//! Catalog import report

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Summary returned after a catalog import run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ImportReport {
    pub requested: i32,
    pub imported: i32,
    /// Identifiers skipped because a book with that ID already exists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_ids: Vec<String>,
    /// Non-fatal problems, e.g. an unreadable publication date stored as empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub message: String,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.imported == self.requested
    }

    /// Fill in the human readable summary from the counters.
    pub fn summarize(&mut self) {
        let mut message = format!(
            "{}/{} books have been imported.",
            self.imported, self.requested
        );
        if !self.is_complete() {
            if self.duplicate_ids.is_empty() {
                message.push_str(&format!(
                    " {} matching books were not found.",
                    self.requested - self.imported
                ));
            } else {
                message.push_str(&format!(
                    " {} books were found with already existing IDs.",
                    self.duplicate_ids.len()
                ));
            }
        }
        self.message = message;
    }
}
