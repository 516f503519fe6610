use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::{Granularity, MetricPoint, PeriodBucket, VideoStat};

/// Period label for a publish timestamp, all in UTC:
/// day and week are `YYYY-MM-DD` (week = the Sunday on or before the date),
/// month is `YYYY-M` with no zero padding.
pub fn period_key(granularity: Granularity, published_at: DateTime<Utc>) -> String {
    let date = published_at.date_naive();
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let days_back = date.weekday().num_days_from_sunday() as i64;
            (date - Duration::days(days_back))
                .format("%Y-%m-%d")
                .to_string()
        }
        Granularity::Month => format!("{}-{}", date.year(), date.month()),
    }
}

/// Accumulate raw counters into one bucket per distinct period. Every stat
/// lands in exactly one bucket.
pub fn group_by_period(
    stats: &[VideoStat],
    granularity: Granularity,
) -> HashMap<String, PeriodBucket> {
    let mut buckets: HashMap<String, PeriodBucket> = HashMap::new();

    for stat in stats {
        let bucket = buckets
            .entry(period_key(granularity, stat.published_at))
            .or_default();
        bucket.views += stat.views;
        bucket.likes += stat.likes;
        bucket.comments += stat.comments;
        bucket.count += 1;
    }

    buckets
}

/// Derive per-bucket metrics and emit them chronologically ascending.
///
/// Day and week labels sort correctly as strings; month labels are `YYYY-M`
/// and must be ordered numerically (a string sort puts "2024-10" before
/// "2024-9").
pub fn compute_metrics(
    buckets: HashMap<String, PeriodBucket>,
    granularity: Granularity,
    cpm: f64,
) -> Vec<MetricPoint> {
    let mut points: Vec<MetricPoint> = buckets
        .into_iter()
        .map(|(label, bucket)| metric_point(label, bucket, cpm))
        .collect();

    match granularity {
        Granularity::Month => points.sort_by_key(|p| month_ordinal(&p.period_label)),
        _ => points.sort_by(|a, b| a.period_label.cmp(&b.period_label)),
    }

    points
}

fn metric_point(label: String, bucket: PeriodBucket, cpm: f64) -> MetricPoint {
    let views = bucket.views as f64;
    let likes = bucket.likes as f64;
    let comments = bucket.comments as f64;

    let (engagement_rate, like_to_view_ratio, comment_rate) = if bucket.views > 0 {
        (
            (likes + comments) / views,
            likes / views * 100.0,
            comments / views * 100.0,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    MetricPoint {
        period_label: label,
        engagement_rate,
        like_to_view_ratio,
        comment_rate,
        estimated_earnings: views / 1000.0 * cpm,
    }
}

fn month_ordinal(label: &str) -> (i32, u32) {
    let mut parts = label.splitn(2, '-');
    let year = parts.next().and_then(|y| y.parse().ok()).unwrap_or(0);
    let month = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0);
    (year, month)
}
