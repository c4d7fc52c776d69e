use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ReportStatus;

/// Report counts per status.
///
/// `total` counts every stored report, including rows whose status is not
/// one of the four known values, so it can exceed the sum of the buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportStats {
    #[serde(rename = "Pending")]
    pub pending: i64,
    #[serde(rename = "Verifying")]
    pub verifying: i64,
    #[serde(rename = "Solved")]
    pub solved: i64,
    #[serde(rename = "Rejected")]
    pub rejected: i64,
    #[serde(rename = "Total")]
    pub total: i64,
}

impl ReportStats {
    /// Fold one `GROUP BY status` row into the counts
    pub fn add(&mut self, status: &str, count: i64) {
        match status.parse::<ReportStatus>() {
            Ok(ReportStatus::Pending) => self.pending += count,
            Ok(ReportStatus::Verifying) => self.verifying += count,
            Ok(ReportStatus::Solved) => self.solved += count,
            Ok(ReportStatus::Rejected) => self.rejected += count,
            Err(_) => {}
        }
        self.total += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_only_counts_toward_total() {
        let mut stats = ReportStats::default();
        stats.add("Pending", 2);
        stats.add("Rejected", 1);
        stats.add("Pendiente", 4);

        assert_eq!(stats.pending, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.total, 7);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(ReportStats::default()).unwrap();
        for key in ["Pending", "Verifying", "Solved", "Rejected", "Total"] {
            assert_eq!(json[key], 0, "{}", key);
        }
    }
}
