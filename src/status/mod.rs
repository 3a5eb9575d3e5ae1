//! Status classification and presentation.
//!
//! [`classify`] is the pure mapping from raw status codes to display
//! semantics; [`build_rows`] projects a result-store snapshot into the
//! ordered display model the status template consumes.

use chrono::{DateTime, Utc};

use crate::store::ProbeResult;

/// Semantic reading of a raw probe status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub text: &'static str,
    pub success: bool,
}

/// Map a raw status code to its display classification.
///
/// Total over all integers; transport failures carry the negative sentinel
/// and fall through to the default arm.
pub fn classify(status: i32) -> Classification {
    let (text, success) = match status {
        200 => ("ok", true),
        304 => ("redirected", true),
        404 => ("not found", false),
        500 | 501 | 502 | 503 => ("server error", false),
        _ => ("no response", false),
    };
    Classification { text, success }
}

/// One row of the status page.
#[derive(Debug, Clone)]
pub struct StatusRow {
    pub index: usize,
    pub url: String,
    pub status_code: i32,
    pub status_text: &'static str,
    pub success: bool,
    pub last: String,
}

/// Project a result-store snapshot into display rows.
///
/// Rows come out sorted by the target's original configured index, regardless
/// of the completion order of the probes that wrote them. Elapsed time since
/// the last probe is truncated to whole seconds.
pub fn build_rows(mut results: Vec<ProbeResult>, now: DateTime<Utc>) -> Vec<StatusRow> {
    results.sort_by_key(|r| r.index);

    results
        .into_iter()
        .map(|r| {
            let class = classify(r.status);
            let elapsed = (now - r.probed_at).num_seconds();
            StatusRow {
                index: r.index,
                url: r.label,
                status_code: r.status,
                status_text: class.text,
                success: class.success,
                last: format_duration(elapsed),
            }
        })
        .collect()
}

/// Format a whole-second duration as `5s`, `1m30s`, `2h3m10s`.
pub fn format_duration(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_classify_table() {
        let cases: &[(i32, &str, bool)] = &[
            (200, "ok", true),
            (304, "redirected", true),
            (404, "not found", false),
            (500, "server error", false),
            (501, "server error", false),
            (502, "server error", false),
            (503, "server error", false),
        ];
        for &(status, text, success) in cases {
            let class = classify(status);
            assert_eq!(class.text, text, "status {status}");
            assert_eq!(class.success, success, "status {status}");
        }
    }

    #[test]
    fn test_classify_everything_else_is_no_response() {
        for status in [-1, 0, 100, 201, 204, 301, 302, 403, 418, 504, 999] {
            let class = classify(status);
            assert_eq!(class.text, "no response", "status {status}");
            assert!(!class.success, "status {status}");
        }
    }

    fn result_at(index: usize, status: i32, probed_at: DateTime<Utc>) -> ProbeResult {
        ProbeResult {
            index,
            label: format!("site {index}"),
            status,
            probed_at,
        }
    }

    #[test]
    fn test_rows_sorted_by_configured_index() {
        let now = Utc::now();
        // Snapshot arrives in completion order, not display order.
        let results = vec![
            result_at(2, 200, now),
            result_at(0, 503, now),
            result_at(1, -1, now),
        ];

        let rows = build_rows(results, now);
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(rows[0].status_text, "server error");
        assert_eq!(rows[1].status_text, "no response");
        assert_eq!(rows[2].status_text, "ok");
        assert_eq!(rows[2].status_code, 200);
        assert!(rows[2].success);
    }

    #[test]
    fn test_rows_elapsed_truncated_to_seconds() {
        let now = Utc::now();
        let probed_at = now - Duration::milliseconds(90_750);

        let rows = build_rows(vec![result_at(0, 200, probed_at)], now);
        assert_eq!(rows[0].last, "1m30s");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(60), "1m0s");
        assert_eq!(format_duration(90), "1m30s");
        assert_eq!(format_duration(7390), "2h3m10s");
        // Clock skew can make elapsed negative; clamp instead of underflowing.
        assert_eq!(format_duration(-5), "0s");
    }
}
