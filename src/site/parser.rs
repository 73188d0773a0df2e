// Page extraction for the lyrics site.
//
// Every function takes raw HTML and returns owned data; the parsed document
// never outlives the call.

use crate::site::lyrics::SENTINEL;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const NOT_FOUND: &str = ".render_404-headline";
const ARTIST_NAME: &str = "h1.profile_identity-name_iq_and_role_icon";
const ALBUM_CARD: &str = "mini-album-card";
const ALBUM_TITLE: &str = "div.mini_card-title";
const ALBUM_SUBTITLE: &str = "div.mini_card-subtitle";
const LINK: &str = "a[href]";
const TRACK_ROW: &str = "a.u-display_block";
const LYRICS_CONTAINER: &str = r#"div[data-lyrics-container="true"], div[class^="Lyrics__Container"]"#;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("artist page reports no such artist")]
    NotFound,
    #[error("unexpected page shape: {0}")]
    Unexpected(String),
}

/// An album card from the artist page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumCard {
    pub title: String,
    pub release_year: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistPage {
    /// The site's spelling of the artist name
    pub canonical_name: String,
    pub albums: Vec<AlbumCard>,
}

/// A song row from an album page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLink {
    pub title: String,
    pub url: String,
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Unexpected(format!("bad selector {}: {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Absolute URL for an href found on a page of `base_url`
pub fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// Canonical artist name and album cards, in page order
pub fn parse_artist_page(html: &str, base_url: &str) -> Result<ArtistPage, ParseError> {
    let document = Html::parse_document(html);

    if document.select(&selector(NOT_FOUND)?).next().is_some() {
        return Err(ParseError::NotFound);
    }

    let canonical_name = document
        .select(&selector(ARTIST_NAME)?)
        .next()
        .map(|h1| {
            element_text(h1)
                .trim()
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParseError::Unexpected("artist name header missing".to_string()))?;

    let title_selector = selector(ALBUM_TITLE)?;
    let subtitle_selector = selector(ALBUM_SUBTITLE)?;
    let link_selector = selector(LINK)?;

    let albums = document
        .select(&selector(ALBUM_CARD)?)
        .enumerate()
        .map(|(position, card)| {
            let href = card
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| {
                    ParseError::Unexpected(format!("album card {} has no link", position + 1))
                })?;

            let text_of = |s: &Selector| {
                card.select(s)
                    .next()
                    .map(|e| element_text(e).trim().to_string())
                    .unwrap_or_default()
            };

            Ok(AlbumCard {
                title: text_of(&title_selector),
                release_year: text_of(&subtitle_selector),
                url: resolve_url(base_url, href),
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(ArtistPage {
        canonical_name,
        albums,
    })
}

/// Song rows of an album page, in page order
pub fn parse_album_tracks(html: &str, base_url: &str) -> Result<Vec<TrackLink>, ParseError> {
    let document = Html::parse_document(html);

    document
        .select(&selector(TRACK_ROW)?)
        .enumerate()
        .map(|(position, row)| {
            let href = row.value().attr("href").ok_or_else(|| {
                ParseError::Unexpected(format!("track row {} has no link", position + 1))
            })?;

            let text = element_text(row);
            let title = text
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .ok_or_else(|| {
                    ParseError::Unexpected(format!("track row {} has no title", position + 1))
                })?;

            Ok(TrackLink {
                title: title.to_string(),
                url: resolve_url(base_url, href),
            })
        })
        .collect()
}

/// Raw lyric text of a song page.
///
/// Text nodes inside one container are joined with the sentinel so line and
/// block boundaries survive until cleaning; non-empty containers are joined
/// with a space.
pub fn extract_raw_lyrics(html: &str) -> Result<String, ParseError> {
    let document = Html::parse_document(html);
    let separator = SENTINEL.to_string();

    let blocks: Vec<String> = document
        .select(&selector(LYRICS_CONTAINER)?)
        .filter(|container| container.text().any(|t| !t.is_empty()))
        .map(|container| container.text().collect::<Vec<_>>().join(&separator))
        .collect();

    Ok(blocks.join(" "))
}
