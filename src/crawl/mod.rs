// # Crawl Module
//
// Artist crawl in five stages, each one completing fully before the next:
//
// - **Album discovery**: Renders the artist page and reads its album cards
// - **Track lists**: Fans out over album pages (bounded workers)
// - **Lyrics**: Fans out over song pages (bounded workers)
// - **Sentiment**: Scores every record off the async runtime
// - **Persistence**: One cache write for the whole collection
//
// Public API:
// - `CrawlService`: Runs a crawl for an `Artist`
// - `CrawlOptions`: Base URL, worker counts, render timeout, limits
// - `CrawlProgress`: Real-time progress updates
// - `CrawlError`: Which stage failed and why

mod album_discovery;
mod error;
mod fan_out;
mod lyric_pages;
mod service;
mod track_lists;
mod types;

pub use error::{CrawlError, Stage, StageError, WorkerError};
pub use service::CrawlService;
pub use types::{CrawlOptions, CrawlProgress, CrawlReport};
