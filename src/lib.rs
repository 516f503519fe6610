pub mod config;
pub mod error;
pub mod models;
pub mod modules;
pub mod youtube_api;

pub use config::Config;
pub use error::{Error, ErrorClass, Result};
pub use models::{
    AnalysisResult, CancellationFlag, ErrorResult, Granularity, MetricPoint, PeriodBucket,
    ProgressData, VideoRef, VideoStat,
};
pub use modules::analyze::analyze;
pub use youtube_api::{VideoApi, YouTubeClient};
