use crate::config::Config;
use crate::crawl::error::Stage;
use crate::models::PipelineState;
use std::time::Duration;

/// Progress updates emitted while a crawl runs
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlProgress {
    StageStarted {
        stage: Stage,
        total: usize,
    },
    ItemCompleted {
        stage: Stage,
        current: usize,
        total: usize,
        percent: u8,
    },
    CacheHit {
        artist: String,
        songs: usize,
    },
    StageFailed {
        stage: Stage,
        error: String,
    },
    Complete {
        artist: String,
        songs: usize,
    },
}

/// Knobs for one crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub base_url: String,
    pub album_workers: usize,
    pub song_workers: usize,
    pub render_timeout: Duration,
    /// Only crawl the first N albums of the artist page
    pub max_albums: Option<usize>,
    /// Only fetch lyrics for the first N songs
    pub max_songs: Option<usize>,
}

impl CrawlOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            album_workers: config.album_workers,
            song_workers: config.song_workers,
            render_timeout: config.render_timeout,
            max_albums: None,
            max_songs: None,
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Canonical artist name
    pub artist: String,
    pub state: PipelineState,
    pub albums: usize,
    pub songs: usize,
    pub lyrics: usize,
    pub from_cache: bool,
    pub persisted: bool,
    pub elapsed: Duration,
}

pub(crate) fn percent(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((current * 100) / total).min(100) as u8
}
