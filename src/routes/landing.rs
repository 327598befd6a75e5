use crate::api::ScheduleId;
use serde::{Deserialize, Serialize};

/// Schedule information with entry counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub schedule_id: ScheduleId,
    pub schedule_name: String,
    pub entry_count: u64,
}

pub const LIST_SCHEDULES: &str = "list_schedules";
pub const POST_SCHEDULE: &str = "store_schedule";
