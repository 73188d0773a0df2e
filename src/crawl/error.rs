use crate::cache::CacheError;
use crate::crawl::fan_out::{FanOutFailure, TaskFailure};
use crate::models::InvalidTransition;
use crate::site::parser::ParseError;
use crate::site::{FetchError, RenderError};
use std::fmt;
use thiserror::Error;

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    AlbumDiscovery,
    TrackLists,
    Lyrics,
    Sentiment,
    Persistence,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AlbumDiscovery => "album discovery",
            Stage::TrackLists => "track lists",
            Stage::Lyrics => "lyrics",
            Stage::Sentiment => "sentiment",
            Stage::Persistence => "persistence",
        };
        f.write_str(name)
    }
}

/// Why a single fan-out worker gave up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("unexpected page at {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Error, Debug)]
pub enum StageError {
    #[error("{artist} was not found - did you spell it correctly?")]
    NotFound { artist: String },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("unexpected page at {url}: {reason}")]
    UnexpectedPage { url: String, reason: String },
    #[error("'{item}' failed with {completed}/{total} done ({percent:.1}% complete): {source}")]
    Fetch {
        item: String,
        #[source]
        source: WorkerError,
        completed: usize,
        total: usize,
        percent: f64,
    },
    #[error("worker for '{item}' panicked: {reason}")]
    WorkerPanicked { item: String, reason: String },
    #[error("cache write failed: {0}")]
    Persist(#[source] CacheError),
    #[error(transparent)]
    State(#[from] InvalidTransition),
}

impl StageError {
    /// Attribute a fan-out failure to the item at its input position
    pub(crate) fn from_fan_out(failure: FanOutFailure<WorkerError>, item: impl Into<String>) -> Self {
        let item = item.into();
        let percent = failure.percent_complete();
        match failure.failure {
            TaskFailure::Failed(source) => StageError::Fetch {
                item,
                source,
                completed: failure.completed,
                total: failure.total,
                percent,
            },
            TaskFailure::Panicked(reason) => StageError::WorkerPanicked { item, reason },
        }
    }
}

/// A stage failure. The artist keeps its last fully completed state.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct CrawlError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl CrawlError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.source, StageError::NotFound { .. })
    }
}
