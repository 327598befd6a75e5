use crate::api::{AggregateTotals, CableEntry};
use crate::services::paging::PageWindow;
use serde::{Deserialize, Serialize};

/// One resolved page of a schedule's entries.
///
/// `entries` carry resolver annotations (group ids, numbering, totals) and
/// are ready for display. `page_totals` covers the page only; whole-schedule
/// totals come from the totals view and are fetched independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePageData {
    pub entries: Vec<CableEntry>,
    pub window: PageWindow,
    pub page_totals: AggregateTotals,
}

pub const GET_SCHEDULE_PAGE: &str = "get_schedule_page";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_data_serializes() {
        let data = SchedulePageData {
            entries: vec![],
            window: PageWindow {
                page: 1,
                page_size: 100,
                total_count: 0,
                total_pages: 0,
            },
            page_totals: AggregateTotals::default(),
        };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"page\":1"));
        assert!(json.contains("\"total_count\":0"));
    }

    #[test]
    fn test_const_value() {
        assert_eq!(GET_SCHEDULE_PAGE, "get_schedule_page");
    }
}
