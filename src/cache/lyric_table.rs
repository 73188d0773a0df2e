// Columnar encoding of a lyric collection.
//
// A table is a list of named, typed columns of equal length, one row per
// LyricRecord, written with bincode behind a magic tag and schema version.
// Sentiment numbers are stored as plain values and never recomputed on load.

use crate::models::{LyricRecord, LyricSentiment, LyricText};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

const TABLE_MAGIC: [u8; 4] = *b"LYRT";
const SCHEMA_VERSION: u16 = 1;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("song '{0}' has no sentiment yet and cannot be stored")]
    Incomplete(String),
    #[error("encoding failed: {0}")]
    Encode(#[from] bincode::Error),
    #[error("invalid lyric table: {0}")]
    Decode(String),
}

/// Values of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValues {
    Utf8(Vec<String>),
    UInt64(Vec<u64>),
    Float64(Vec<f64>),
}

impl ColumnValues {
    fn len(&self) -> usize {
        match self {
            ColumnValues::Utf8(values) => values.len(),
            ColumnValues::UInt64(values) => values.len(),
            ColumnValues::Float64(values) => values.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

#[derive(Debug, Serialize, Deserialize)]
struct LyricTable {
    magic: [u8; 4],
    version: u16,
    row_count: u64,
    columns: Vec<Column>,
}

fn utf8_column(name: &str, records: &[LyricRecord], field: impl Fn(&LyricRecord) -> &str) -> Column {
    Column {
        name: name.to_string(),
        values: ColumnValues::Utf8(records.iter().map(|r| field(r).to_string()).collect()),
    }
}

/// Encode records into table bytes. Every record must carry sentiment.
pub fn encode(records: &[LyricRecord]) -> Result<Vec<u8>, TableError> {
    let sentiments = records
        .iter()
        .map(|r| {
            r.sentiment
                .ok_or_else(|| TableError::Incomplete(r.song_title.clone()))
        })
        .collect::<Result<Vec<LyricSentiment>, _>>()?;

    let columns = vec![
        utf8_column("artist", records, |r| &r.artist),
        utf8_column("album", records, |r| &r.album),
        utf8_column("song_title", records, |r| &r.song_title),
        utf8_column("song_link", records, |r| &r.song_link),
        utf8_column("album_link", records, |r| &r.album_link),
        utf8_column("album_year", records, |r| &r.album_year),
        utf8_column("rough_lyrics", records, |r| &r.rough_lyrics),
        utf8_column("lyrics", records, |r| r.lyrics.as_str()),
        Column {
            name: "num_words".to_string(),
            values: ColumnValues::UInt64(sentiments.iter().map(|s| s.num_words).collect()),
        },
        Column {
            name: "unique_words".to_string(),
            values: ColumnValues::UInt64(sentiments.iter().map(|s| s.unique_words).collect()),
        },
        Column {
            name: "polarity".to_string(),
            values: ColumnValues::Float64(sentiments.iter().map(|s| s.polarity).collect()),
        },
        Column {
            name: "subjectivity".to_string(),
            values: ColumnValues::Float64(sentiments.iter().map(|s| s.subjectivity).collect()),
        },
    ];

    let table = LyricTable {
        magic: TABLE_MAGIC,
        version: SCHEMA_VERSION,
        row_count: records.len() as u64,
        columns,
    };

    Ok(bincode::serialize(&table)?)
}

/// Decode table bytes back into records, re-wrapping cleaned text as `LyricText`
pub fn decode(bytes: &[u8]) -> Result<Vec<LyricRecord>, TableError> {
    let table: LyricTable =
        bincode::deserialize(bytes).map_err(|e| TableError::Decode(e.to_string()))?;

    if table.magic != TABLE_MAGIC {
        return Err(TableError::Decode("not a lyric table".to_string()));
    }
    if table.version != SCHEMA_VERSION {
        return Err(TableError::Decode(format!(
            "unsupported schema version {}",
            table.version
        )));
    }

    let rows = table.row_count as usize;
    let mut columns = HashMap::with_capacity(table.columns.len());
    for column in table.columns {
        if column.values.len() != rows {
            return Err(TableError::Decode(format!(
                "column '{}' has {} values, expected {}",
                column.name,
                column.values.len(),
                rows
            )));
        }
        columns.insert(column.name, column.values);
    }

    let mut artist = take_utf8(&mut columns, "artist")?;
    let mut album = take_utf8(&mut columns, "album")?;
    let mut song_title = take_utf8(&mut columns, "song_title")?;
    let mut song_link = take_utf8(&mut columns, "song_link")?;
    let mut album_link = take_utf8(&mut columns, "album_link")?;
    let mut album_year = take_utf8(&mut columns, "album_year")?;
    let mut rough_lyrics = take_utf8(&mut columns, "rough_lyrics")?;
    let mut lyrics = take_utf8(&mut columns, "lyrics")?;
    let num_words = take_u64(&mut columns, "num_words")?;
    let unique_words = take_u64(&mut columns, "unique_words")?;
    let polarity = take_f64(&mut columns, "polarity")?;
    let subjectivity = take_f64(&mut columns, "subjectivity")?;

    let records = (0..rows)
        .map(|i| LyricRecord {
            artist: std::mem::take(&mut artist[i]),
            album: std::mem::take(&mut album[i]),
            song_title: std::mem::take(&mut song_title[i]),
            song_link: std::mem::take(&mut song_link[i]),
            album_link: std::mem::take(&mut album_link[i]),
            album_year: std::mem::take(&mut album_year[i]),
            rough_lyrics: std::mem::take(&mut rough_lyrics[i]),
            lyrics: LyricText::new(std::mem::take(&mut lyrics[i])),
            sentiment: Some(LyricSentiment {
                num_words: num_words[i],
                unique_words: unique_words[i],
                polarity: polarity[i],
                subjectivity: subjectivity[i],
            }),
        })
        .collect();

    Ok(records)
}

fn take_column(
    columns: &mut HashMap<String, ColumnValues>,
    name: &str,
) -> Result<ColumnValues, TableError> {
    columns
        .remove(name)
        .ok_or_else(|| TableError::Decode(format!("missing column '{}'", name)))
}

fn take_utf8(
    columns: &mut HashMap<String, ColumnValues>,
    name: &str,
) -> Result<Vec<String>, TableError> {
    match take_column(columns, name)? {
        ColumnValues::Utf8(values) => Ok(values),
        _ => Err(TableError::Decode(format!("column '{}' is not utf8", name))),
    }
}

fn take_u64(columns: &mut HashMap<String, ColumnValues>, name: &str) -> Result<Vec<u64>, TableError> {
    match take_column(columns, name)? {
        ColumnValues::UInt64(values) => Ok(values),
        _ => Err(TableError::Decode(format!("column '{}' is not u64", name))),
    }
}

fn take_f64(columns: &mut HashMap<String, ColumnValues>, name: &str) -> Result<Vec<f64>, TableError> {
    match take_column(columns, name)? {
        ColumnValues::Float64(values) => Ok(values),
        _ => Err(TableError::Decode(format!("column '{}' is not f64", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, sentiment: Option<LyricSentiment>) -> LyricRecord {
        LyricRecord {
            artist: "Phoebe Bridgers".to_string(),
            album: "Punisher".to_string(),
            song_title: title.to_string(),
            song_link: format!("https://genius.com/{}", title),
            album_link: "https://genius.com/albums/punisher".to_string(),
            album_year: "2020".to_string(),
            rough_lyrics: "[Verse 1];Hello;there".to_string(),
            lyrics: LyricText::new("Hello\nthere"),
            sentiment,
        }
    }

    fn sentiment(polarity: f64) -> LyricSentiment {
        LyricSentiment {
            num_words: 2,
            unique_words: 2,
            polarity,
            subjectivity: 0.1 + 0.2,
        }
    }

    #[test]
    fn test_encode_decode_keeps_float_bits() {
        let records = vec![
            record("Kyoto", Some(sentiment(-0.333_333_333_333_333_3))),
            record("Garden Song", Some(sentiment(f64::MIN_POSITIVE))),
        ];

        let decoded = decode(&encode(&records).unwrap()).unwrap();

        assert_eq!(decoded, records);
        assert_eq!(
            decoded[0].sentiment.unwrap().subjectivity.to_bits(),
            (0.1f64 + 0.2).to_bits()
        );
    }

    #[test]
    fn test_empty_collection() {
        let decoded = decode(&encode(&[]).unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_refuses_records_without_sentiment() {
        let records = vec![record("Kyoto", Some(sentiment(0.0))), record("Halloween", None)];
        match encode(&records) {
            Err(TableError::Incomplete(title)) => assert_eq!(title, "Halloween"),
            other => panic!("expected incomplete error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_foreign_bytes() {
        assert!(matches!(decode(b"not a table"), Err(TableError::Decode(_))));

        let table = LyricTable {
            magic: *b"XXXX",
            version: SCHEMA_VERSION,
            row_count: 0,
            columns: Vec::new(),
        };
        let bytes = bincode::serialize(&table).unwrap();
        assert!(matches!(decode(&bytes), Err(TableError::Decode(_))));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let table = LyricTable {
            magic: TABLE_MAGIC,
            version: SCHEMA_VERSION,
            row_count: 2,
            columns: vec![Column {
                name: "artist".to_string(),
                values: ColumnValues::Utf8(vec!["only one".to_string()]),
            }],
        };
        let bytes = bincode::serialize(&table).unwrap();
        match decode(&bytes) {
            Err(TableError::Decode(msg)) => assert!(msg.contains("artist")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
