use crate::models::LyricRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `records` to `path` as a pretty-printed JSON array, in order
pub fn export_json(records: &[LyricRecord], path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("Exported {} songs to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LyricSentiment, LyricText};
    use tempfile::TempDir;

    #[test]
    fn test_export_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lyrics.json");

        let records = vec![LyricRecord {
            artist: "Kendrick Lamar".to_string(),
            album: "DAMN.".to_string(),
            song_title: "LOYALTY.".to_string(),
            song_link: "https://genius.com/loyalty".to_string(),
            album_link: "https://genius.com/albums/damn".to_string(),
            album_year: "2017".to_string(),
            rough_lyrics: "Loyalty;Loyalty".to_string(),
            lyrics: LyricText::new("Loyalty\nLoyalty"),
            sentiment: Some(LyricSentiment {
                num_words: 2,
                unique_words: 1,
                polarity: 0.0,
                subjectivity: 0.0,
            }),
        }];

        export_json(&records, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["song_title"], "LOYALTY.");
        assert_eq!(json[0]["lyrics"], "Loyalty\nLoyalty");
        assert_eq!(json[0]["sentiment"]["unique_words"], 1);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("lyrics.json");
        assert!(matches!(export_json(&[], &path), Err(ExportError::Io(_))));
    }
}
