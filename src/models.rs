use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where an artist is in the crawl pipeline.
///
/// Progress only moves forward through the crawl states. `CacheLoaded` is the
/// single bypass: it is reachable from `Created` only and ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Created,
    AlbumsLoaded,
    SongsLoaded,
    LyricsLoaded,
    SentimentComputed,
    Persisted,
    CacheLoaded,
}

impl PipelineState {
    /// Whether `next` is a legal successor of `self`
    pub fn can_advance_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Created, AlbumsLoaded)
                | (Created, CacheLoaded)
                | (AlbumsLoaded, SongsLoaded)
                | (SongsLoaded, LyricsLoaded)
                | (LyricsLoaded, SentimentComputed)
                | (SentimentComputed, Persisted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Persisted | PipelineState::CacheLoaded)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Created => "created",
            PipelineState::AlbumsLoaded => "albums loaded",
            PipelineState::SongsLoaded => "songs loaded",
            PipelineState::LyricsLoaded => "lyrics loaded",
            PipelineState::SentimentComputed => "sentiment computed",
            PipelineState::Persisted => "persisted",
            PipelineState::CacheLoaded => "loaded from cache",
        };
        f.write_str(name)
    }
}

/// An album as listed on the artist page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    /// Free text as shown on the card, e.g. "2017" or "Album · 2017"
    pub release_year: String,
    pub url: String,
    pub artist: String,
}

/// A song as listed on its album page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub url: String,
    pub album: String,
    pub album_url: String,
    pub album_year: String,
    pub artist: String,
}

/// Cleaned lyric text with the word-level views the enricher and callers use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LyricText(String);

impl LyricText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Whitespace-separated tokens, as they appear in the text
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Occurrences per distinct token
    pub fn word_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for word in self.words() {
            *counts.entry(word).or_insert(0) += 1;
        }
        counts
    }

    /// Non-empty lyric lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

impl fmt::Display for LyricText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numbers computed by the sentiment stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LyricSentiment {
    pub num_words: u64,
    pub unique_words: u64,
    /// In [-1, 1]
    pub polarity: f64,
    /// In [0, 1]
    pub subjectivity: f64,
}

/// Lyrics for one song. Sentiment stays `None` until the enricher runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricRecord {
    pub artist: String,
    pub album: String,
    pub song_title: String,
    pub song_link: String,
    pub album_link: String,
    pub album_year: String,
    pub rough_lyrics: String,
    pub lyrics: LyricText,
    pub sentiment: Option<LyricSentiment>,
}

impl LyricRecord {
    pub fn from_song(song: &Song, rough_lyrics: String, lyrics: LyricText) -> Self {
        Self {
            artist: song.artist.clone(),
            album: song.album.clone(),
            song_title: song.title.clone(),
            song_link: song.url.clone(),
            album_link: song.album_url.clone(),
            album_year: song.album_year.clone(),
            rough_lyrics,
            lyrics,
            sentiment: None,
        }
    }
}

/// An artist and everything the crawl has gathered for it so far
#[derive(Debug, Clone)]
pub struct Artist {
    /// User input until discovery resolves the site's canonical spelling
    pub name: String,
    pub albums: Vec<Album>,
    pub songs: Vec<Song>,
    pub lyrics: Vec<LyricRecord>,
    pub force_refresh: bool,
    pub loaded_from_cache: bool,
    state: PipelineState,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            albums: Vec::new(),
            songs: Vec::new(),
            lyrics: Vec::new(),
            force_refresh: false,
            loaded_from_cache: false,
            state: PipelineState::Created,
        }
    }

    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Move to `next`, refusing anything but a forward edge of the state machine
    pub fn advance_to(&mut self, next: PipelineState) -> Result<(), InvalidTransition> {
        if !self.state.can_advance_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// First record whose title contains `query`, ignoring case
    pub fn find_lyric(&self, query: &str) -> Option<&LyricRecord> {
        let query = query.to_lowercase();
        self.lyrics
            .iter()
            .find(|record| record.song_title.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move artist from '{from}' to '{to}'")]
pub struct InvalidTransition {
    pub from: PipelineState,
    pub to: PipelineState,
}
