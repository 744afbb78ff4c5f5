use serde::{Deserialize, Serialize};
use taskdeck_core::DailyActivity;

/// `?days=N`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub data: Vec<DailyActivity>,
}
