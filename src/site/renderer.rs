// Rendering of the artist page.
//
// The album list only materializes after client-side interaction, so the
// artist page goes through a renderer rather than the plain fetcher.

#[cfg(feature = "browser")]
mod chromium;

#[cfg(feature = "browser")]
pub use chromium::ChromiumRenderer;

use crate::site::fetcher::PageFetcher;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DRIVER_REMEDIATION: &str = "this browser/driver combination is not supported, install a \
current Chrome or Chromium (https://www.google.com/chrome/) or point LYRICSENSE_CHROME_PATH at one";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("browser driver unavailable: {reason}\n{remediation}")]
    DriverUnavailable { reason: String, remediation: String },
    #[error("album list did not render within {0:?}")]
    Timeout(Duration),
    #[error("browser error: {0}")]
    Browser(String),
    #[error("no artist page at {0}")]
    NotFound(String),
}

impl RenderError {
    pub fn driver_unavailable(reason: impl Into<String>) -> Self {
        RenderError::DriverUnavailable {
            reason: reason.into(),
            remediation: DRIVER_REMEDIATION.to_string(),
        }
    }
}

/// Produces the fully rendered HTML of an artist page
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
    /// `slug` is the URL form of the artist name, e.g. `Kendrick-lamar`
    async fn render_artist_page(&self, slug: &str, timeout: Duration)
        -> Result<String, RenderError>;
}

pub fn artist_page_url(base_url: &str, slug: &str) -> String {
    format!("{}/artists/{}", base_url, slug)
}

/// Renderer that takes the artist page as served, without interaction.
///
/// Only the albums present in the initial document are seen.
pub struct StaticPageRenderer {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl StaticPageRenderer {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl PageRenderer for StaticPageRenderer {
    async fn render_artist_page(
        &self,
        slug: &str,
        timeout: Duration,
    ) -> Result<String, RenderError> {
        let url = artist_page_url(&self.base_url, slug);

        let page = tokio::time::timeout(timeout, self.fetcher.fetch(&url))
            .await
            .map_err(|_| RenderError::Timeout(timeout))?
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        if page.status == 404 {
            return Err(RenderError::NotFound(url));
        }

        if page.is_success() {
            Ok(page.body)
        } else {
            Err(RenderError::Browser(format!(
                "HTTP {} from {}",
                page.status, url
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::fetcher::{FetchError, FetchedPage};

    struct FixedFetcher {
        status: u16,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl PageFetcher for FixedFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            tokio::time::sleep(self.delay).await;
            Ok(FetchedPage {
                url: url.to_string(),
                status: self.status,
                body: format!("<p>{}</p>", url),
            })
        }
    }

    fn renderer(status: u16, delay: Duration) -> StaticPageRenderer {
        StaticPageRenderer::new(
            Arc::new(FixedFetcher { status, delay }),
            "https://genius.com",
        )
    }

    #[tokio::test]
    async fn test_static_renderer_returns_artist_page() {
        let html = renderer(200, Duration::ZERO)
            .render_artist_page("Adele", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(html, "<p>https://genius.com/artists/Adele</p>");
    }

    #[tokio::test]
    async fn test_static_renderer_maps_404_to_not_found() {
        let result = renderer(404, Duration::ZERO)
            .render_artist_page("Nobody", Duration::from_secs(1))
            .await;
        assert_eq!(
            result,
            Err(RenderError::NotFound(
                "https://genius.com/artists/Nobody".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_static_renderer_times_out() {
        let result = renderer(200, Duration::from_millis(200))
            .render_artist_page("Adele", Duration::from_millis(10))
            .await;
        assert_eq!(result, Err(RenderError::Timeout(Duration::from_millis(10))));
    }

    #[test]
    fn test_driver_error_carries_remediation() {
        let message = RenderError::driver_unavailable("no chrome").to_string();
        assert!(message.contains("no chrome"));
        assert!(message.contains("LYRICSENSE_CHROME_PATH"));
    }
}
