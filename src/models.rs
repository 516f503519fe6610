use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// --- Pipeline data ---

/// A video discovered in the lookback window. Identity is the video id;
/// the publish date is carried forward for period bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

/// Engagement counters for one video, joined back to its publish date.
/// Counters the API omits (statistics disabled) are zero here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStat {
    pub id: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub published_at: DateTime<Utc>,
}

/// Running sums for one calendar period. Integer accumulation only;
/// derived metrics are computed once from the final sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodBucket {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub count: u64,
}

/// Bucketing granularity for the aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// Derived metrics for one period bucket. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub period_label: String,
    pub engagement_rate: f64,
    pub like_to_view_ratio: f64,
    pub comment_rate: f64,
    pub estimated_earnings: f64,
}

// --- Caller-facing payloads ---

/// One metric series per granularity, each chronologically ascending.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressData {
    pub daily: Vec<MetricPoint>,
    pub weekly: Vec<MetricPoint>,
    pub monthly: Vec<MetricPoint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub channel_id: String,
    pub total_videos: usize,
    pub raw_stats: Vec<VideoStat>,
    pub progress_data: ProgressData,
    /// Trailing slices of the day series, keyed `last{N}Days`.
    pub windowed: BTreeMap<String, Vec<MetricPoint>>,
}

/// What the caller shows when the pipeline fails. The full error stays in
/// the logs; this carries only the user-visible message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResult {
    pub error: String,
}

// --- Request control ---

#[derive(Clone, Default)]
pub struct CancellationFlag(pub Arc<AtomicBool>);

impl CancellationFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
