use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{CancellationFlag, VideoRef, VideoStat};
use crate::youtube_api::{VideoApi, VideoStatsItem, MAX_PAGE_SIZE};

/// Fetch engagement counters for all discovered videos, one remote call per
/// chunk of `MAX_PAGE_SIZE` ids. Chunks are independent and run with
/// bounded concurrency; all of them must succeed before anything is
/// returned. Output order is unspecified.
pub async fn fetch_video_stats<A: VideoApi + ?Sized>(
    api: &A,
    refs: &[VideoRef],
    concurrency: usize,
    cancel: &CancellationFlag,
) -> Result<Vec<VideoStat>> {
    if refs.is_empty() {
        return Ok(Vec::new());
    }

    // Join key for recovering publish dates; response order is not trusted.
    let published: HashMap<&str, DateTime<Utc>> = refs
        .iter()
        .map(|r| (r.id.as_str(), r.published_at))
        .collect();

    let chunks: Vec<Vec<String>> = refs
        .chunks(MAX_PAGE_SIZE)
        .map(|chunk| chunk.iter().map(|r| r.id.clone()).collect())
        .collect();

    let results: Vec<Result<Vec<VideoStatsItem>>> = stream::iter(chunks.into_iter())
        .map(|ids| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                api.video_statistics(&ids).await
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut stats = Vec::with_capacity(refs.len());
    for result in results {
        for item in result? {
            let published_at = match published.get(item.id.as_str()) {
                Some(ts) => *ts,
                None => {
                    debug!(id = %item.id, "statistics for a video we never asked about, ignoring");
                    continue;
                }
            };

            if item.views.is_none() || item.likes.is_none() || item.comments.is_none() {
                debug!(id = %item.id, "one or more counters absent, defaulting to zero");
            }

            stats.push(VideoStat {
                views: item.views.unwrap_or(0),
                likes: item.likes.unwrap_or(0),
                comments: item.comments.unwrap_or(0),
                id: item.id,
                published_at,
            });
        }
    }

    info!(requested = refs.len(), returned = stats.len(), "statistics fetched");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube_api::{ResolvedVideo, SearchPage};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn refs(n: usize) -> Vec<VideoRef> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        (0..n)
            .map(|i| VideoRef {
                id: format!("video-{:03}", i),
                published_at: base + chrono::Duration::hours(i as i64),
            })
            .collect()
    }

    /// Answers every chunk with full counters and records the chunk sizes.
    struct BatchApi {
        chunk_sizes: Mutex<Vec<usize>>,
        fail_chunks_containing: Option<String>,
        omit_ids: Vec<String>,
    }

    impl BatchApi {
        fn new() -> Self {
            Self {
                chunk_sizes: Mutex::new(Vec::new()),
                fail_chunks_containing: None,
                omit_ids: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl VideoApi for BatchApi {
        async fn resolve_video(&self, _video_id: &str) -> Result<Option<ResolvedVideo>> {
            unimplemented!("not used by the stats batcher")
        }

        async fn search_videos(
            &self,
            _channel_id: &str,
            _published_after: DateTime<Utc>,
            _page_token: Option<&str>,
        ) -> Result<SearchPage> {
            unimplemented!("not used by the stats batcher")
        }

        async fn video_statistics(&self, ids: &[String]) -> Result<Vec<VideoStatsItem>> {
            self.chunk_sizes.lock().unwrap().push(ids.len());

            if let Some(marker) = &self.fail_chunks_containing {
                if ids.iter().any(|id| id == marker) {
                    return Err(Error::Api {
                        status: 500,
                        message: "scripted chunk failure".to_string(),
                    });
                }
            }

            Ok(ids
                .iter()
                .filter(|id| !self.omit_ids.contains(id))
                .map(|id| VideoStatsItem {
                    id: id.clone(),
                    views: Some(100),
                    likes: Some(10),
                    comments: Some(5),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn one_hundred_twenty_refs_take_three_calls() {
        let api = BatchApi::new();
        let cancel = CancellationFlag::default();

        let stats = fetch_video_stats(&api, &refs(120), 4, &cancel).await.unwrap();
        assert_eq!(stats.len(), 120);

        let mut sizes = api.chunk_sizes.lock().unwrap().clone();
        sizes.sort();
        assert_eq!(sizes, vec![20, 50, 50]);
    }

    #[tokio::test]
    async fn chunk_failure_fails_the_whole_batch() {
        let api = BatchApi {
            fail_chunks_containing: Some("video-075".to_string()),
            ..BatchApi::new()
        };
        let cancel = CancellationFlag::default();

        let result = fetch_video_stats(&api, &refs(120), 4, &cancel).await;
        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn refs_with_no_statistics_record_are_dropped() {
        let api = BatchApi {
            omit_ids: vec!["video-001".to_string()],
            ..BatchApi::new()
        };
        let cancel = CancellationFlag::default();

        let stats = fetch_video_stats(&api, &refs(3), 4, &cancel).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.id != "video-001"));
    }

    #[tokio::test]
    async fn absent_counters_default_to_zero_independently() {
        struct GapApi;

        #[async_trait]
        impl VideoApi for GapApi {
            async fn resolve_video(&self, _: &str) -> Result<Option<ResolvedVideo>> {
                unimplemented!()
            }

            async fn search_videos(
                &self,
                _: &str,
                _: DateTime<Utc>,
                _: Option<&str>,
            ) -> Result<SearchPage> {
                unimplemented!()
            }

            async fn video_statistics(&self, ids: &[String]) -> Result<Vec<VideoStatsItem>> {
                Ok(vec![VideoStatsItem {
                    id: ids[0].clone(),
                    views: Some(40),
                    likes: None,
                    comments: None,
                }])
            }
        }

        let cancel = CancellationFlag::default();
        let stats = fetch_video_stats(&GapApi, &refs(1), 4, &cancel).await.unwrap();
        assert_eq!(stats[0].views, 40);
        assert_eq!(stats[0].likes, 0);
        assert_eq!(stats[0].comments, 0);
    }

    #[tokio::test]
    async fn publish_dates_are_joined_back_by_id() {
        let api = BatchApi::new();
        let cancel = CancellationFlag::default();
        let input = refs(2);

        let stats = fetch_video_stats(&api, &input, 4, &cancel).await.unwrap();
        for stat in stats {
            let original = input.iter().find(|r| r.id == stat.id).unwrap();
            assert_eq!(stat.published_at, original.published_at);
        }
    }

    #[tokio::test]
    async fn cancellation_fails_the_batch() {
        let api = BatchApi::new();
        let cancel = CancellationFlag::default();
        cancel.cancel();

        let result = fetch_video_stats(&api, &refs(10), 4, &cancel).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
