use super::{artist_page_url, PageRenderer, RenderError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

const NOT_FOUND_SELECTOR: &str = ".render_404-headline";
const SHOW_ALL_ALBUMS_SELECTOR: &str = ".full_width_button.u-clickable.u-quarter_top_margin";
const ALBUM_MODAL_SELECTOR: &str = ".act-show.cont-artists.snarly.u-noscroll.u-dark_overlay";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Headless Chrome renderer that opens the album modal and scrolls it so
/// every album card is loaded before the document is read.
pub struct ChromiumRenderer {
    base_url: String,
    headless: bool,
    chrome_executable: Option<PathBuf>,
}

impl ChromiumRenderer {
    pub fn new(
        base_url: impl Into<String>,
        headless: bool,
        chrome_executable: Option<PathBuf>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            headless,
            chrome_executable,
        }
    }

    async fn launch(&self) -> Result<(Browser, tokio::task::JoinHandle<()>), RenderError> {
        let mut builder = BrowserConfig::builder();
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(RenderError::driver_unavailable)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::driver_unavailable(e.to_string()))?;

        // The CDP handler must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok((browser, handler_task))
    }

    async fn open_album_list(&self, page: &Page, timeout: Duration) -> Result<String, RenderError> {
        page.wait_for_navigation().await.map_err(browser_error)?;

        if page.find_element(NOT_FOUND_SELECTOR).await.is_ok() {
            debug!("ChromiumRenderer: artist page is a 404");
            return page.content().await.map_err(browser_error);
        }

        tokio::time::timeout(timeout, expand_album_list(page))
            .await
            .map_err(|_| RenderError::Timeout(timeout))??;

        page.content().await.map_err(browser_error)
    }
}

#[async_trait::async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render_artist_page(
        &self,
        slug: &str,
        timeout: Duration,
    ) -> Result<String, RenderError> {
        let url = artist_page_url(&self.base_url, slug);
        info!("ChromiumRenderer: rendering {}", url);

        let (mut browser, handler_task) = self.launch().await?;

        let result = match browser.new_page(url.as_str()).await {
            Ok(page) => self.open_album_list(&page, timeout).await,
            Err(e) => Err(browser_error(e)),
        };

        if let Err(e) = browser.close().await {
            warn!("ChromiumRenderer: failed to close browser: {}", e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }
}

/// Click "show all albums", wait for the modal, then scroll it to the bottom
/// twice so lazily loaded cards arrive
async fn expand_album_list(page: &Page) -> Result<(), RenderError> {
    let button = wait_for_element(page, SHOW_ALL_ALBUMS_SELECTOR).await;
    button.click().await.map_err(browser_error)?;

    let modal = wait_for_element(page, ALBUM_MODAL_SELECTOR).await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    modal.click().await.map_err(browser_error)?;
    for _ in 0..2 {
        modal.press_key("End").await.map_err(browser_error)?;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    Ok(())
}

async fn wait_for_element(page: &Page, selector: &str) -> Element {
    loop {
        if let Ok(element) = page.find_element(selector).await {
            return element;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn browser_error(e: chromiumoxide::error::CdpError) -> RenderError {
    RenderError::Browser(e.to_string())
}
