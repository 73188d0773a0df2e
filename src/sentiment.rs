// # Sentiment
//
// Word counts plus polarity/subjectivity for each cleaned lyric. Scoring sits
// behind `SentimentScorer`; the built-in `LexiconScorer` averages the scores
// of known words, adjusting for a preceding intensifier or negation.

mod lexicon;

use crate::models::{LyricRecord, LyricSentiment, LyricText};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Maps text to (polarity in [-1, 1], subjectivity in [0, 1])
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> (f64, f64);
}

pub struct LexiconScorer {
    entries: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

const NEGATION_FACTOR: f64 = -0.5;

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            entries: lexicon::ENTRIES
                .iter()
                .map(|&(word, polarity, subjectivity)| (word, (polarity, subjectivity)))
                .collect(),
            intensifiers: lexicon::INTENSIFIERS.iter().copied().collect(),
            negations: lexicon::NEGATIONS.iter().copied().collect(),
        }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> (f64, f64) {
        let tokens = tokenize(text);
        let mut scored = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&(mut polarity, mut subjectivity)) = self.entries.get(token.as_str()) else {
                continue;
            };

            let previous = i.checked_sub(1).map(|p| tokens[p].as_str());
            if let Some(factor) = previous.and_then(|p| self.intensifiers.get(p)) {
                polarity *= factor;
                subjectivity *= factor;
            }

            // "not good", "not very good"
            let negated = tokens[i.saturating_sub(2)..i]
                .iter()
                .any(|t| self.negations.contains(t.as_str()));
            if negated {
                polarity *= NEGATION_FACTOR;
            }

            scored.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));
        }

        if scored.is_empty() {
            return (0.0, 0.0);
        }

        let n = scored.len() as f64;
        let polarity = scored.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = scored.iter().map(|(_, s)| s).sum::<f64>() / n;
        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0))
    }
}

/// (word count, distinct word count) of cleaned text, tokens taken as-is
pub fn word_stats(text: &LyricText) -> (u64, u64) {
    let counts = text.word_counts();
    let total = counts.values().sum::<usize>();
    (total as u64, counts.len() as u64)
}

pub fn enrich_record(record: &mut LyricRecord, scorer: &dyn SentimentScorer) {
    let (num_words, unique_words) = word_stats(&record.lyrics);
    let (polarity, subjectivity) = scorer.score(record.lyrics.as_str());

    record.sentiment = Some(LyricSentiment {
        num_words,
        unique_words,
        polarity: polarity.clamp(-1.0, 1.0),
        subjectivity: subjectivity.clamp(0.0, 1.0),
    });
}

/// Enrich every record in place, in parallel. Order is untouched.
pub fn enrich_records(records: &mut [LyricRecord], scorer: &dyn SentimentScorer) {
    records
        .par_iter_mut()
        .for_each(|record| enrich_record(record, scorer));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lyrics: &str) -> LyricRecord {
        LyricRecord {
            artist: "A".to_string(),
            album: "B".to_string(),
            song_title: lyrics.to_string(),
            song_link: String::new(),
            album_link: String::new(),
            album_year: String::new(),
            rough_lyrics: lyrics.to_string(),
            lyrics: LyricText::new(lyrics),
            sentiment: None,
        }
    }

    #[test]
    fn test_positive_and_negative_text() {
        let scorer = LexiconScorer::new();
        let (happy, _) = scorer.score("I feel so happy and free");
        let (sad, subjectivity) = scorer.score("cold and lonely, broken heart");
        assert!(happy > 0.0);
        assert!(sad < 0.0);
        assert!(subjectivity > 0.0);
    }

    #[test]
    fn test_negation_flips_and_damps_polarity() {
        let scorer = LexiconScorer::new();
        let (good, _) = scorer.score("good");
        let (not_good, _) = scorer.score("not good");
        let (not_very_good, _) = scorer.score("don't very good");
        assert!((not_good - good * NEGATION_FACTOR).abs() < 1e-9);
        assert!(not_very_good < 0.0);
    }

    #[test]
    fn test_unknown_words_are_neutral() {
        assert_eq!(LexiconScorer::new().score("la la la"), (0.0, 0.0));
        assert_eq!(LexiconScorer::new().score(""), (0.0, 0.0));
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let scorer = LexiconScorer::new();
        for text in [
            "extremely perfect extremely wonderful totally best",
            "extremely awful extremely terrible",
            "not extremely awful",
            "never never worst",
            "Hello world\nLa la",
        ] {
            let (polarity, subjectivity) = scorer.score(text);
            assert!((-1.0..=1.0).contains(&polarity), "{}: {}", text, polarity);
            assert!((0.0..=1.0).contains(&subjectivity), "{}: {}", text, subjectivity);
        }
    }

    #[test]
    fn test_word_stats_are_case_sensitive() {
        let text = LyricText::new("La la la\nland La");
        assert_eq!(word_stats(&text), (5, 3));
    }

    #[test]
    fn test_enrich_records_keeps_order_and_fills_every_record() {
        let mut records: Vec<LyricRecord> = (0..50)
            .map(|i| record(&format!("song {} love", i)))
            .collect();

        enrich_records(&mut records, &LexiconScorer::new());

        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.song_title, format!("song {} love", i));
            let sentiment = record.sentiment.expect("sentiment computed");
            assert_eq!(sentiment.num_words, 3);
            assert_eq!(sentiment.unique_words, 3);
            assert!(sentiment.polarity > 0.0);
        }
    }
}
