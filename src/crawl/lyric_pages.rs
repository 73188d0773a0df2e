use crate::crawl::error::{StageError, WorkerError};
use crate::crawl::fan_out::fan_out;
use crate::models::{LyricRecord, Song};
use crate::site::lyrics::clean_lyrics;
use crate::site::parser::extract_raw_lyrics;
use crate::site::PageFetcher;
use std::sync::Arc;
use tracing::debug;

/// Fetch every song page and extract its lyrics, one record per song in
/// song order. A non-success status on any song fails the whole stage.
pub(crate) async fn fetch_lyrics(
    fetcher: Arc<dyn PageFetcher>,
    songs: &[Song],
    workers: usize,
    on_complete: impl FnMut(usize, usize),
) -> Result<Vec<LyricRecord>, StageError> {
    fan_out(songs.to_vec(), workers, on_complete, |song| {
        let fetcher = fetcher.clone();
        async move { song_lyrics(fetcher.as_ref(), song).await }
    })
    .await
    .map_err(|failure| {
        let item = songs
            .get(failure.index)
            .map(|song| song.title.clone())
            .unwrap_or_default();
        StageError::from_fan_out(failure, item)
    })
}

async fn song_lyrics(fetcher: &dyn PageFetcher, song: Song) -> Result<LyricRecord, WorkerError> {
    debug!("Grabbing lyrics for {}", song.title);

    let body = fetcher.fetch(&song.url).await?.into_success_body()?;
    let rough = extract_raw_lyrics(&body).map_err(|source| WorkerError::Parse {
        url: song.url.clone(),
        source,
    })?;
    let lyrics = clean_lyrics(&rough);

    Ok(LyricRecord::from_song(&song, rough, lyrics))
}
