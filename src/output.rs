//! Result types returned by a transformation run.

use serde::{Deserialize, Serialize};

/// Statistics for one completed run.
///
/// Captioning numbers are informational: a failed caption is a degraded
/// image, not a failed run, so `caption_failures` can be non-zero on a
/// successful result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Pages walked (every page in the document, with or without images).
    pub pages: usize,

    /// Images transformed and re-inserted.
    pub images: usize,

    /// Captions successfully obtained from the remote endpoint.
    pub captions: usize,

    /// Caption requests that failed and degraded to "no caption".
    pub caption_failures: usize,

    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serialises() {
        let report = RunReport {
            pages: 2,
            images: 1,
            captions: 1,
            caption_failures: 0,
            duration_ms: 42,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pages"], 2);
        assert_eq!(json["images"], 1);
    }
}
