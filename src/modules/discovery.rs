use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{CancellationFlag, VideoRef};
use crate::youtube_api::VideoApi;

// Safety limit to prevent infinite loops or huge quota usage. 40 pages is
// 2000 videos, far above realistic upload volume inside a lookback window.
pub const MAX_SEARCH_PAGES: usize = 40;

/// Enumerate every video the channel published after the cutoff, following
/// continuation tokens until the remote reports no more pages.
///
/// The loop is strictly sequential: each request depends on the token from
/// the previous response. Any page error fails the whole discovery; no
/// partial list is returned.
pub async fn discover_videos<A: VideoApi + ?Sized>(
    api: &A,
    channel_id: &str,
    published_after: DateTime<Utc>,
    cancel: &CancellationFlag,
) -> Result<Vec<VideoRef>> {
    let mut videos = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if pages >= MAX_SEARCH_PAGES {
            return Err(Error::PaginationOverflow(MAX_SEARCH_PAGES));
        }

        let page = api
            .search_videos(channel_id, published_after, page_token.as_deref())
            .await?;
        pages += 1;

        for video in page.items {
            // The cutoff is already in the request; drop anything a
            // misbehaving remote returns outside it anyway.
            if video.published_at < published_after {
                debug!(id = %video.id, "video predates cutoff, skipping");
                continue;
            }
            videos.push(video);
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!(channel_id, pages, total = videos.len(), "video discovery complete");
    Ok(videos)
}
