// # Site
//
// Everything that knows about the lyrics website: fetching pages, rendering
// the artist page, reading the DOM and cleaning lyric text.

pub mod fetcher;
pub mod lyrics;
pub mod parser;
pub mod renderer;

pub use fetcher::{FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use renderer::{PageRenderer, RenderError, StaticPageRenderer};

#[cfg(feature = "browser")]
pub use renderer::ChromiumRenderer;

/// URL form of a user-typed artist name: trimmed, whitespace runs become `-`
pub fn artist_slug(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}
