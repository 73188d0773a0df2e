use crate::crawl::error::StageError;
use crate::models::Album;
use crate::site::parser::{parse_artist_page, ParseError};
use crate::site::renderer::artist_page_url;
use crate::site::{artist_slug, PageRenderer, RenderError};
use std::time::Duration;
use tracing::{debug, info};

/// What the artist page told us
#[derive(Debug, Clone)]
pub(crate) struct Discovery {
    pub canonical_name: String,
    pub albums: Vec<Album>,
}

/// Render the artist page and read its album cards, in page order.
pub(crate) async fn discover_albums(
    renderer: &dyn PageRenderer,
    base_url: &str,
    artist_name: &str,
    timeout: Duration,
) -> Result<Discovery, StageError> {
    let slug = artist_slug(artist_name);
    if slug.is_empty() {
        return Err(StageError::NotFound {
            artist: artist_name.to_string(),
        });
    }

    debug!("Rendering artist page for {}", slug);
    let html = match renderer.render_artist_page(&slug, timeout).await {
        Ok(html) => html,
        Err(RenderError::NotFound(_)) => {
            return Err(StageError::NotFound {
                artist: artist_name.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let page = parse_artist_page(&html, base_url).map_err(|e| match e {
        ParseError::NotFound => StageError::NotFound {
            artist: artist_name.to_string(),
        },
        ParseError::Unexpected(reason) => StageError::UnexpectedPage {
            url: artist_page_url(base_url, &slug),
            reason,
        },
    })?;

    // An artist page always lists at least one album once fully rendered
    if page.albums.is_empty() {
        return Err(StageError::UnexpectedPage {
            url: artist_page_url(base_url, &slug),
            reason: "no albums rendered".to_string(),
        });
    }

    let canonical_name = page.canonical_name;
    let albums: Vec<Album> = page
        .albums
        .into_iter()
        .map(|card| Album {
            title: card.title,
            release_year: card.release_year,
            url: card.url,
            artist: canonical_name.clone(),
        })
        .collect();

    info!("Found {} albums for {}", albums.len(), canonical_name);

    Ok(Discovery {
        canonical_name,
        albums,
    })
}
