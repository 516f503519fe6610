use chrono::{Duration, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{AnalysisResult, CancellationFlag, Granularity, ProgressData};
use crate::modules::{aggregate, discovery, stats, url, window};
use crate::youtube_api::VideoApi;

/// Run the whole pipeline for one submitted URL:
/// video id → channel → discovery → statistics → period metrics → windows.
///
/// Invoked once per inbound request; any failure aborts the run and maps to
/// a single typed error, never a partial result.
pub async fn analyze<A: VideoApi + ?Sized>(
    api: &A,
    config: &Config,
    video_url: &str,
    lookback_days: u32,
    cancel: &CancellationFlag,
) -> Result<AnalysisResult> {
    // 1. Validate the input before touching the network.
    let video_id = url::extract_video_id(video_url)
        .ok_or_else(|| Error::InvalidUrl(video_url.to_string()))?;

    // 2. Resolve the owning channel. One round trip, no pagination.
    let resolved = api
        .resolve_video(video_id)
        .await?
        .ok_or_else(|| Error::VideoNotFound(video_id.to_string()))?;
    let channel_id = resolved
        .channel_id
        .ok_or_else(|| Error::ChannelNotFound(video_id.to_string()))?;

    let published_after = Utc::now() - Duration::days(i64::from(lookback_days));
    info!(%channel_id, lookback_days, "starting channel analysis");

    // 3. Enumerate videos in the lookback window, then fetch their counters.
    let videos = discovery::discover_videos(api, &channel_id, published_after, cancel).await?;
    let raw_stats = stats::fetch_video_stats(api, &videos, config.stats_concurrency, cancel).await?;

    // 4. Aggregate into per-period metrics at each granularity.
    let daily = aggregate::compute_metrics(
        aggregate::group_by_period(&raw_stats, Granularity::Day),
        Granularity::Day,
        config.cpm,
    );
    let weekly = aggregate::compute_metrics(
        aggregate::group_by_period(&raw_stats, Granularity::Week),
        Granularity::Week,
        config.cpm,
    );
    let monthly = aggregate::compute_metrics(
        aggregate::group_by_period(&raw_stats, Granularity::Month),
        Granularity::Month,
        config.cpm,
    );

    // 5. Trailing display windows come from the day series alone.
    let windowed = window::assemble_windows(&daily, &window::DEFAULT_WINDOW_SIZES);

    info!(
        total_videos = videos.len(),
        day_buckets = daily.len(),
        "channel analysis complete"
    );

    Ok(AnalysisResult {
        channel_id,
        total_videos: videos.len(),
        raw_stats,
        progress_data: ProgressData {
            daily,
            weekly,
            monthly,
        },
        windowed,
    })
}
