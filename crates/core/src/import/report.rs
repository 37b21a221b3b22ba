//! Result aggregation for an import run.

use serde::{Deserialize, Serialize};

/// A failed row: its display position and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

impl RowError {
    pub fn new(row: usize, error: impl Into<String>) -> Self {
        Self {
            row,
            error: error.into(),
        }
    }
}

/// Summary returned to the caller after every row has been attempted.
///
/// `success + failed == total` always holds, and `total` is the number of
/// decoded rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<RowError>,
}

impl ImportResult {
    /// An empty result for an import of `total` rows.
    pub fn new(total: usize) -> Self {
        Self {
            success: 0,
            failed: 0,
            total,
            errors: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, error: RowError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Number of rows with a recorded outcome so far.
    pub fn processed(&self) -> usize {
        self.success + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_track_outcomes() {
        let mut result = ImportResult::new(3);
        result.record_success();
        result.record_failure(RowError::new(3, "bad"));
        result.record_success();

        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.processed(), result.total);
        assert_eq!(result.errors, vec![RowError::new(3, "bad")]);
    }

    #[test]
    fn serializes_to_the_wire_shape() {
        let mut result = ImportResult::new(2);
        result.record_success();
        result.record_failure(RowError::new(3, "Missing"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": 1,
                "failed": 1,
                "total": 2,
                "errors": [{ "row": 3, "error": "Missing" }],
            })
        );
    }
}
