use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::VideoRef;

pub const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Page size for search and batch size for statistics lookups. A Data API
/// limit, not a tunable.
pub const MAX_PAGE_SIZE: usize = 50;

// --- API models ---

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    pub items: Option<Vec<VideoResource>>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResource {
    pub id: String,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
}

// Counters come over the wire as strings, each independently optional. A
// video with statistics disabled reports absent counters, not an error.
#[derive(Debug, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    pub items: Option<Vec<SearchResource>>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResource {
    pub id: SearchResourceId,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResourceId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchSnippet {
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
}

// --- Boundary types handed to the pipeline ---

/// Outcome of the single resolving lookup for a video id.
#[derive(Debug, Clone)]
pub struct ResolvedVideo {
    pub channel_id: Option<String>,
}

/// One page of search results plus the continuation token, if any.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<VideoRef>,
    pub next_page_token: Option<String>,
}

/// Parsed counters for one video. `None` means the counter was absent.
#[derive(Debug, Clone)]
pub struct VideoStatsItem {
    pub id: String,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

fn parse_count(value: Option<&String>) -> Option<u64> {
    value.and_then(|v| v.parse::<u64>().ok())
}

impl VideoListResponse {
    fn into_resolved(self) -> Option<ResolvedVideo> {
        self.items?.into_iter().next().map(|item| ResolvedVideo {
            channel_id: item.snippet.and_then(|s| s.channel_id),
        })
    }

    fn into_stats_items(self) -> Vec<VideoStatsItem> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .map(|item| VideoStatsItem {
                views: parse_count(item.statistics.as_ref().and_then(|s| s.view_count.as_ref())),
                likes: parse_count(item.statistics.as_ref().and_then(|s| s.like_count.as_ref())),
                comments: parse_count(
                    item.statistics.as_ref().and_then(|s| s.comment_count.as_ref()),
                ),
                id: item.id,
            })
            .collect()
    }
}

impl SearchListResponse {
    fn into_page(self) -> Result<SearchPage> {
        let mut items = Vec::new();
        for item in self.items.unwrap_or_default() {
            // Identifiers are required; there is no sensible default for them.
            let id = item
                .id
                .video_id
                .ok_or_else(|| Error::Payload("search item without videoId".to_string()))?;
            let published_at = item
                .snippet
                .and_then(|s| s.published_at)
                .ok_or_else(|| Error::Payload(format!("search item {} without publishedAt", id)))?;
            items.push(VideoRef { id, published_at });
        }
        Ok(SearchPage {
            items,
            next_page_token: self.next_page_token,
        })
    }
}

// --- Remote service seam ---

/// The slice of the Data API the pipeline consumes. Implemented by
/// `YouTubeClient` in production and scripted fakes in tests.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Single lookup of a video's metadata. `Ok(None)` when the video does
    /// not exist.
    async fn resolve_video(&self, video_id: &str) -> Result<Option<ResolvedVideo>>;

    /// One page of the channel's videos published after the cutoff.
    async fn search_videos(
        &self,
        channel_id: &str,
        published_after: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<SearchPage>;

    /// Bulk statistics lookup for up to `MAX_PAGE_SIZE` ids.
    async fn video_statistics(&self, ids: &[String]) -> Result<Vec<VideoStatsItem>>;
}

/// HTTP client for the YouTube Data API v3.
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Payload(format!("failed to parse {}: {}. Response: {}", what, e, text)))
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    async fn resolve_video(&self, video_id: &str) -> Result<Option<ResolvedVideo>> {
        let url = format!(
            "{}/videos?part=snippet&id={}&key={}",
            self.base_url, video_id, self.api_key
        );

        let list: VideoListResponse = self.get_json(&url, "VideoListResponse").await?;
        Ok(list.into_resolved())
    }

    async fn search_videos(
        &self,
        channel_id: &str,
        published_after: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let mut url = format!(
            "{}/search?part=id,snippet&type=video&channelId={}&publishedAfter={}&maxResults={}&key={}",
            self.base_url,
            channel_id,
            published_after.to_rfc3339_opts(SecondsFormat::Secs, true),
            MAX_PAGE_SIZE,
            self.api_key
        );
        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", token));
        }

        let list: SearchListResponse = self.get_json(&url, "SearchListResponse").await?;
        list.into_page()
    }

    async fn video_statistics(&self, ids: &[String]) -> Result<Vec<VideoStatsItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/videos?part=statistics&id={}&key={}",
            self.base_url,
            ids.join(","),
            self.api_key
        );

        let list: VideoListResponse = self.get_json(&url, "VideoListResponse").await?;
        Ok(list.into_stats_items())
    }
}
