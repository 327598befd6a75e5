use crate::api::AggregateTotals;
use serde::{Deserialize, Serialize};

/// Whole-schedule aggregate view.
///
/// Refreshed independently of page views so page transitions never trigger a
/// full-schedule scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTotalsView {
    pub totals: AggregateTotals,
    pub entry_count: u64,
}

pub const GET_SCHEDULE_TOTALS: &str = "get_schedule_totals";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_view_serializes() {
        let view = ScheduleTotalsView {
            totals: AggregateTotals {
                total_length: 1250.5,
                total_cost: 48200.0,
            },
            entry_count: 310,
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"total_length\":1250.5"));
        assert!(json.contains("\"entry_count\":310"));
    }

    #[test]
    fn test_const_value() {
        assert_eq!(GET_SCHEDULE_TOTALS, "get_schedule_totals");
    }
}
