//! Validation result placeholder exposed by records.
//!
//! Records carry no validation rules; this type keeps the
//! `errors_for`/`full_messages` shape available to callers that expect one.

/// Always-empty validation outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationResult;

impl ValidationResult {
    pub fn new() -> Self {
        Self
    }

    /// Messages recorded for `field`. Always empty.
    pub fn errors_for(&self, _field: &str) -> &[String] {
        &[]
    }

    /// Human-readable messages across all fields. Always empty.
    pub fn full_messages(&self) -> Vec<String> {
        Vec::new()
    }

    pub fn is_empty(&self) -> bool {
        true
    }
}
