use lyricsense::site::renderer::artist_page_url;
use lyricsense::site::{
    artist_slug, FetchError, FetchedPage, PageFetcher, PageRenderer, RenderError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE_URL: &str = "https://lyrics.test";

const NOT_FOUND_PAGE: &str =
    r#"<html><body><h1 class="render_404-headline">Oops! Page not found</h1></body></html>"#;

fn url_part(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}

struct FixtureAlbum {
    title: String,
    year: String,
    songs: Vec<String>,
}

/// A small fake lyrics site: one artist, its albums, their songs
pub struct SiteFixture {
    pub artist_name: String,
    albums: Vec<FixtureAlbum>,
}

impl SiteFixture {
    pub fn new(artist_name: &str) -> Self {
        Self {
            artist_name: artist_name.to_string(),
            albums: Vec::new(),
        }
    }

    /// Song titles must be unique across the whole fixture
    pub fn album(mut self, title: &str, year: &str, songs: &[&str]) -> Self {
        self.albums.push(FixtureAlbum {
            title: title.to_string(),
            year: year.to_string(),
            songs: songs.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn slug(&self) -> String {
        artist_slug(&self.artist_name)
    }

    pub fn album_url(&self, title: &str) -> String {
        format!("{}/albums/{}/{}", BASE_URL, self.slug(), url_part(title))
    }

    pub fn song_url(&self, title: &str) -> String {
        format!("{}/{}-{}-lyrics", BASE_URL, self.slug(), url_part(title))
    }

    /// Every song title, album by album
    pub fn song_titles(&self) -> Vec<String> {
        self.albums
            .iter()
            .flat_map(|album| album.songs.iter().cloned())
            .collect()
    }

    pub fn artist_html(&self) -> String {
        let cards: String = self
            .albums
            .iter()
            .map(|album| {
                format!(
                    r#"<mini-album-card>
                         <a href="{}">
                           <div class="mini_card-title">{}</div>
                           <div class="mini_card-subtitle">{}</div>
                         </a>
                       </mini-album-card>"#,
                    self.album_url(&album.title),
                    album.title,
                    album.year
                )
            })
            .collect();

        format!(
            r#"<html><body>
               <h1 class="profile_identity-name_iq_and_role_icon">
                 {}
                 <span>Verified Artist</span>
               </h1>
               <div class="modal_window">{}</div>
               </body></html>"#,
            self.artist_name, cards
        )
    }

    fn album_html(&self, album: &FixtureAlbum) -> String {
        let rows: String = album
            .songs
            .iter()
            .map(|song| {
                format!(
                    r#"<div class="chart_row">
                         <a class="u-display_block" href="{}">
                           <h3>
                             {}
                             <span>Lyrics</span>
                           </h3>
                         </a>
                       </div>"#,
                    self.song_url(song),
                    song
                )
            })
            .collect();

        format!("<html><body><h1>{}</h1>{}</body></html>", album.title, rows)
    }

    pub fn song_html(title: &str) -> String {
        format!(
            r#"<html><body>
               <div data-lyrics-container="true">[Verse 1]<br>{} is love<br>[Chorus]<br>so happy and free</div>
               </body></html>"#,
            title
        )
    }

    /// Fetcher serving the artist, album and song pages of this fixture
    pub fn fetcher(&self) -> MockFetcher {
        let fetcher = MockFetcher::new();
        fetcher.page(
            &artist_page_url(BASE_URL, &self.slug()),
            200,
            &self.artist_html(),
        );
        for album in &self.albums {
            fetcher.page(&self.album_url(&album.title), 200, &self.album_html(album));
            for song in &album.songs {
                fetcher.page(&self.song_url(song), 200, &Self::song_html(song));
            }
        }
        fetcher
    }

    /// Renderer serving this fixture's artist page
    pub fn renderer(&self) -> MockRenderer {
        let renderer = MockRenderer::new();
        renderer.page(&self.slug(), &self.artist_html());
        renderer
    }
}

/// Page fetcher backed by a URL map. Unknown URLs answer 404.
#[derive(Default)]
pub struct MockFetcher {
    pages: Mutex<HashMap<String, (u16, String)>>,
    delays: Mutex<HashMap<String, Duration>>,
    fetches: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self, url: &str, status: u16, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn delay(&self, url: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let (status, body) = self
            .pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| (404, NOT_FOUND_PAGE.to_string()));

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

/// Renderer backed by a slug map. Unknown slugs render the site's 404 page.
#[derive(Default)]
pub struct MockRenderer {
    pages: Mutex<HashMap<String, String>>,
    delay: Mutex<Option<Duration>>,
    failure: Mutex<Option<RenderError>>,
    renders: AtomicUsize,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self, slug: &str, html: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(slug.to_string(), html.to_string());
    }

    /// Make every render take `delay` before the album list appears
    pub fn slow(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Make every render fail with `error`, e.g. a missing browser driver
    pub fn fail_with(&self, error: RenderError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PageRenderer for MockRenderer {
    async fn render_artist_page(
        &self,
        slug: &str,
        timeout: Duration,
    ) -> Result<String, RenderError> {
        self.renders.fetch_add(1, Ordering::SeqCst);

        let failure = self.failure.lock().unwrap().clone();
        if let Some(error) = failure {
            return Err(error);
        }

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::timeout(timeout, tokio::time::sleep(delay))
                .await
                .map_err(|_| RenderError::Timeout(timeout))?;
        }

        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(slug)
            .cloned()
            .unwrap_or_else(|| NOT_FOUND_PAGE.to_string()))
    }
}
