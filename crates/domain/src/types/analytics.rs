//! Admin dashboard analytics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AnalyticsOverview {
    pub total_posts: u64,
    pub total_users: u64,
    pub total_comments: u64,
    pub pending_comments: u64,
    pub total_views: u64,
    #[serde(default)]
    pub daily_views: Vec<DailyViews>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct DailyViews {
    pub date: NaiveDate,
    pub views: u64,
}
