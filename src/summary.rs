//! End-of-run summary counters.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters for one pipeline run, logged as pretty JSON at debug level.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub input_rows: usize,
    pub students: usize,
    pub reports_written: usize,
    pub reports_failed: usize,
}

impl RunSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary {
            generated_at: Utc::now(),
            input_rows: 3,
            students: 2,
            reports_written: 2,
            reports_failed: 0,
        };

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"students\": 2"));
        assert!(json.contains("\"reports_failed\": 0"));
    }
}
