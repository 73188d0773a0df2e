use crate::crawl::error::{StageError, WorkerError};
use crate::crawl::fan_out::fan_out;
use crate::models::{Album, Song};
use crate::site::parser::parse_album_tracks;
use crate::site::PageFetcher;
use std::sync::Arc;
use tracing::debug;

/// Fetch every album page and list its songs.
///
/// Songs come back grouped by album in album order, then in page order
/// within each album.
pub(crate) async fn fetch_track_lists(
    fetcher: Arc<dyn PageFetcher>,
    base_url: &str,
    albums: &[Album],
    workers: usize,
    on_complete: impl FnMut(usize, usize),
) -> Result<Vec<Song>, StageError> {
    let base_url: Arc<str> = Arc::from(base_url);

    let per_album = fan_out(albums.to_vec(), workers, on_complete, |album| {
        let fetcher = fetcher.clone();
        let base_url = base_url.clone();
        async move { album_songs(fetcher.as_ref(), &base_url, album).await }
    })
    .await
    .map_err(|failure| {
        let item = albums
            .get(failure.index)
            .map(|album| album.title.clone())
            .unwrap_or_default();
        StageError::from_fan_out(failure, item)
    })?;

    Ok(per_album.into_iter().flatten().collect())
}

async fn album_songs(
    fetcher: &dyn PageFetcher,
    base_url: &str,
    album: Album,
) -> Result<Vec<Song>, WorkerError> {
    debug!("Finding album - {}", album.title);

    let body = fetcher.fetch(&album.url).await?.into_success_body()?;
    let tracks = parse_album_tracks(&body, base_url).map_err(|source| WorkerError::Parse {
        url: album.url.clone(),
        source,
    })?;

    Ok(tracks
        .into_iter()
        .map(|track| Song {
            title: track.title,
            url: track.url,
            album: album.title.clone(),
            album_url: album.url.clone(),
            album_year: album.release_year.clone(),
            artist: album.artist.clone(),
        })
        .collect())
}
