use crate::cloud_storage::S3Config;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://genius.com";
pub const DEFAULT_BUCKET: &str = "geniuslyrics";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ALBUM_WORKERS: usize = 5;
pub const DEFAULT_SONG_WORKERS: usize = 7;
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_USER_AGENT: &str = "lyricsense/0.1 (+https://github.com/hideselfview/lyricsense)";

pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_KEY";

/// Whether the S3 cache can be used for this process
#[derive(Debug, Clone)]
pub enum CacheSettings {
    Enabled(S3Config),
    /// Credentials missing; every run crawls fresh
    Disabled { reason: String },
}

impl CacheSettings {
    /// Build from explicit credentials; either one missing disables caching
    pub fn from_credentials(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        bucket_name: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> Self {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        match (non_blank(access_key_id), non_blank(secret_access_key)) {
            (Some(access_key_id), Some(secret_access_key)) => CacheSettings::Enabled(S3Config {
                bucket_name,
                region,
                access_key_id,
                secret_access_key,
                endpoint_url,
            }),
            _ => CacheSettings::Disabled {
                reason: format!(
                    "AWS access keys not found; set {} and {} to enable caching",
                    ACCESS_KEY_VAR, SECRET_KEY_VAR
                ),
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, CacheSettings::Enabled(_))
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Lyrics site root, without a trailing slash
    pub base_url: String,
    pub user_agent: String,
    /// Workers fetching album pages
    pub album_workers: usize,
    /// Workers fetching song pages
    pub song_workers: usize,
    /// Upper bound on waiting for the album list to render
    pub render_timeout: Duration,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub cache: CacheSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            album_workers: DEFAULT_ALBUM_WORKERS,
            song_workers: DEFAULT_SONG_WORKERS,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            headless: true,
            chrome_executable: None,
            cache: CacheSettings::Disabled {
                reason: "caching not configured".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a `.env` file (if any) and the environment
    pub fn load() -> Self {
        if dotenvy::dotenv().is_ok() {
            info!("Config: loaded .env file");
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();

        let cache = CacheSettings::from_credentials(
            var(ACCESS_KEY_VAR),
            var(SECRET_KEY_VAR),
            var("LYRICSENSE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            var("S3_ENDPOINT_URL"),
        );

        if let CacheSettings::Disabled { reason } = &cache {
            warn!("Config: caching disabled: {}", reason);
        }

        Self {
            base_url: var("LYRICSENSE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: var("LYRICSENSE_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            album_workers: parse_workers(var("LYRICSENSE_ALBUM_WORKERS"), DEFAULT_ALBUM_WORKERS),
            song_workers: parse_workers(var("LYRICSENSE_SONG_WORKERS"), DEFAULT_SONG_WORKERS),
            render_timeout: var("LYRICSENSE_RENDER_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RENDER_TIMEOUT),
            headless: var("LYRICSENSE_HEADLESS")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            chrome_executable: var("LYRICSENSE_CHROME_PATH").map(PathBuf::from),
            cache,
        }
    }
}

fn parse_workers(value: Option<String>, default: usize) -> usize {
    value
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}
