// # Crawl Service - Orchestrator
//
// Drives one artist through discovery, the cache check, the two fan-out
// stages, sentiment and the final cache write. Each stage either completes
// for every item or leaves the artist untouched at its previous state.

use crate::cache::{CacheError, LyricCache};
use crate::crawl::album_discovery::discover_albums;
use crate::crawl::error::{CrawlError, Stage, StageError};
use crate::crawl::lyric_pages::fetch_lyrics;
use crate::crawl::track_lists::fetch_track_lists;
use crate::crawl::types::{percent, CrawlOptions, CrawlProgress, CrawlReport};
use crate::models::{Artist, InvalidTransition, LyricRecord, PipelineState};
use crate::sentiment::{enrich_records, SentimentScorer};
use crate::site::{PageFetcher, PageRenderer};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct CrawlService {
    options: CrawlOptions,
    renderer: Arc<dyn PageRenderer>,
    fetcher: Arc<dyn PageFetcher>,
    scorer: Arc<dyn SentimentScorer>,
    cache: LyricCache,
    progress_tx: Option<mpsc::UnboundedSender<CrawlProgress>>,
}

impl CrawlService {
    pub fn new(
        options: CrawlOptions,
        renderer: Arc<dyn PageRenderer>,
        fetcher: Arc<dyn PageFetcher>,
        scorer: Arc<dyn SentimentScorer>,
        cache: LyricCache,
    ) -> Self {
        Self {
            options,
            renderer,
            fetcher,
            scorer,
            cache,
            progress_tx: None,
        }
    }

    /// Send progress updates to `progress_tx` while crawling
    pub fn with_progress(mut self, progress_tx: mpsc::UnboundedSender<CrawlProgress>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    pub fn cache(&self) -> &LyricCache {
        &self.cache
    }

    /// Crawl `artist`, or load it from the cache unless a refresh is forced.
    ///
    /// On error the artist stays at the last state it fully reached.
    pub async fn run(&self, artist: &mut Artist) -> Result<CrawlReport, CrawlError> {
        let started = Instant::now();

        if artist.state() != PipelineState::Created {
            return Err(self.fail(
                Stage::AlbumDiscovery,
                StageError::State(InvalidTransition {
                    from: artist.state(),
                    to: PipelineState::AlbumsLoaded,
                }),
            ));
        }

        // Discovery
        self.emit(CrawlProgress::StageStarted {
            stage: Stage::AlbumDiscovery,
            total: 1,
        });
        let discovery = discover_albums(
            self.renderer.as_ref(),
            &self.options.base_url,
            &artist.name,
            self.options.render_timeout,
        )
        .await
        .map_err(|e| self.fail(Stage::AlbumDiscovery, e))?;

        if discovery.canonical_name != artist.name {
            debug!(
                "Crawl: '{}' resolves to '{}'",
                artist.name, discovery.canonical_name
            );
        }
        artist.name = discovery.canonical_name;

        // Cache
        if artist.force_refresh {
            info!("Crawl: refresh forced for {}, skipping cache", artist.name);
        } else if let Some(records) = self.lookup_cache(&artist.name).await {
            artist
                .advance_to(PipelineState::CacheLoaded)
                .map_err(|e| self.fail(Stage::AlbumDiscovery, e))?;
            artist.lyrics = records;
            artist.loaded_from_cache = true;

            info!(
                "Crawl: loaded {} songs for {} from cache",
                artist.lyrics.len(),
                artist.name
            );
            self.emit(CrawlProgress::CacheHit {
                artist: artist.name.clone(),
                songs: artist.lyrics.len(),
            });
            return Ok(self.report(artist, false, started));
        }

        artist
            .advance_to(PipelineState::AlbumsLoaded)
            .map_err(|e| self.fail(Stage::AlbumDiscovery, e))?;
        artist.albums = discovery.albums;

        // Track lists
        let albums = limit(&artist.albums, self.options.max_albums);
        let album_count = albums.len();
        self.emit(CrawlProgress::StageStarted {
            stage: Stage::TrackLists,
            total: album_count,
        });
        let songs = fetch_track_lists(
            self.fetcher.clone(),
            &self.options.base_url,
            albums,
            self.options.album_workers,
            |current, total| self.item_completed(Stage::TrackLists, current, total),
        )
        .await
        .map_err(|e| self.fail(Stage::TrackLists, e))?;

        artist
            .advance_to(PipelineState::SongsLoaded)
            .map_err(|e| self.fail(Stage::TrackLists, e))?;
        artist.songs = songs;
        info!(
            "Crawl: found {} songs across {} albums",
            artist.songs.len(),
            album_count
        );

        // Lyrics
        let songs = limit(&artist.songs, self.options.max_songs);
        self.emit(CrawlProgress::StageStarted {
            stage: Stage::Lyrics,
            total: songs.len(),
        });
        let records = fetch_lyrics(
            self.fetcher.clone(),
            songs,
            self.options.song_workers,
            |current, total| self.item_completed(Stage::Lyrics, current, total),
        )
        .await
        .map_err(|e| self.fail(Stage::Lyrics, e))?;

        artist
            .advance_to(PipelineState::LyricsLoaded)
            .map_err(|e| self.fail(Stage::Lyrics, e))?;
        artist.lyrics = records;
        info!("Crawl: grabbed lyrics for {} songs", artist.lyrics.len());

        // Sentiment
        self.emit(CrawlProgress::StageStarted {
            stage: Stage::Sentiment,
            total: artist.lyrics.len(),
        });
        let enriched = self
            .enrich(artist.lyrics.clone())
            .await
            .map_err(|e| self.fail(Stage::Sentiment, e))?;

        artist
            .advance_to(PipelineState::SentimentComputed)
            .map_err(|e| self.fail(Stage::Sentiment, e))?;
        artist.lyrics = enriched;

        // Persistence
        let persisted = if artist.lyrics.is_empty() {
            warn!("Crawl: no lyrics found for {}, nothing to save", artist.name);
            false
        } else if self.cache.is_enabled() {
            self.emit(CrawlProgress::StageStarted {
                stage: Stage::Persistence,
                total: 1,
            });
            self.cache
                .save(&artist.name, &artist.lyrics)
                .await
                .map_err(|e| self.fail(Stage::Persistence, StageError::Persist(e)))?;
            artist
                .advance_to(PipelineState::Persisted)
                .map_err(|e| self.fail(Stage::Persistence, e))?;
            true
        } else {
            warn!(
                "Crawl: caching disabled, {} songs for {} were not saved",
                artist.lyrics.len(),
                artist.name
            );
            false
        };

        self.emit(CrawlProgress::Complete {
            artist: artist.name.clone(),
            songs: artist.lyrics.len(),
        });

        Ok(self.report(artist, persisted, started))
    }

    /// Cached records for `artist`, or `None` when the crawl should go ahead
    async fn lookup_cache(&self, artist: &str) -> Option<Vec<LyricRecord>> {
        match self.cache.load(artist).await {
            Ok(records) if records.is_empty() => {
                warn!("Crawl: cached entry for {} is empty, scraping", artist);
                None
            }
            Ok(records) => Some(records),
            Err(CacheError::NotCached(_)) => {
                info!("Crawl: no cached lyrics for {}, scraping", artist);
                None
            }
            Err(CacheError::CachingDisabled(reason)) => {
                debug!("Crawl: cache skipped: {}", reason);
                None
            }
            Err(e) => {
                warn!("Crawl: cache lookup for {} failed, scraping: {}", artist, e);
                None
            }
        }
    }

    async fn enrich(&self, mut records: Vec<LyricRecord>) -> Result<Vec<LyricRecord>, StageError> {
        let scorer = self.scorer.clone();
        tokio::task::spawn_blocking(move || {
            enrich_records(&mut records, scorer.as_ref());
            records
        })
        .await
        .map_err(|e| StageError::WorkerPanicked {
            item: "sentiment".to_string(),
            reason: e.to_string(),
        })
    }

    fn report(&self, artist: &Artist, persisted: bool, started: Instant) -> CrawlReport {
        CrawlReport {
            artist: artist.name.clone(),
            state: artist.state(),
            albums: artist.albums.len(),
            songs: artist.songs.len(),
            lyrics: artist.lyrics.len(),
            from_cache: artist.loaded_from_cache,
            persisted,
            elapsed: started.elapsed(),
        }
    }

    fn fail(&self, stage: Stage, source: impl Into<StageError>) -> CrawlError {
        let err = CrawlError::new(stage, source);
        self.emit(CrawlProgress::StageFailed {
            stage,
            error: err.source.to_string(),
        });
        err
    }

    fn item_completed(&self, stage: Stage, current: usize, total: usize) {
        self.emit(CrawlProgress::ItemCompleted {
            stage,
            current,
            total,
            percent: percent(current, total),
        });
    }

    fn emit(&self, progress: CrawlProgress) {
        if let Some(tx) = &self.progress_tx {
            // Receiver gone just means nobody is watching
            let _ = tx.send(progress);
        }
    }
}

fn limit<T>(items: &[T], max: Option<usize>) -> &[T] {
    match max {
        Some(max) => &items[..max.min(items.len())],
        None => items,
    }
}
