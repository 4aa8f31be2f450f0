//! Vocabulary hints for dialogue.
//!
//! A [`Vocabulary`] is loaded from learning tracker documents shaped like
//! `{ "words": [...], "kanji": [...] }` (either list may be absent) and
//! annotates dialogue with the entries it contains.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::session::DialogueAnnotator;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Word {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Kanji {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub kanji: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Default, Deserialize)]
struct Tracker {
    #[serde(default)]
    words: Vec<Word>,
    #[serde(default)]
    kanji: Vec<Kanji>,
}

/// Entries of a vocabulary found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analysis<'a> {
    pub words: Vec<&'a Word>,
    pub kanji: Vec<&'a Kanji>,
}

impl Analysis<'_> {
    pub fn total(&self) -> usize {
        self.words.len() + self.kanji.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageStats {
    pub total_words: usize,
    pub used_words: usize,
    pub total_kanji: usize,
    pub used_kanji: usize,
}

/// Studied words and kanji plus the ones already used in play.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<Word>,
    kanji: Vec<Kanji>,
    used_words: HashSet<String>,
    used_kanji: HashSet<String>,
}

impl Vocabulary {
    pub fn new(words: Vec<Word>, kanji: Vec<Kanji>) -> Self {
        Self {
            words,
            kanji,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let tracker: Tracker = serde_json::from_str(json).context("invalid tracker JSON")?;
        Ok(Self::new(tracker.words, tracker.kanji))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read tracker {}", path.display()))?;
        let vocabulary = Self::from_json(&text)
            .with_context(|| format!("failed to load tracker {}", path.display()))?;
        info!(
            "loaded {} word(s) and {} kanji from {}",
            vocabulary.words.len(),
            vocabulary.kanji.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    /// Loads every tracker, skipping the ones that cannot be read.
    ///
    /// Hints are optional, so a broken tracker only costs its entries.
    /// The returned errors describe what was skipped.
    pub fn open_all<P: AsRef<Path>>(paths: &[P]) -> (Self, Vec<anyhow::Error>) {
        let mut vocabulary = Self::default();
        let mut skipped = Vec::new();
        for path in paths {
            match Self::open(path) {
                Ok(loaded) => vocabulary.extend(loaded),
                Err(err) => {
                    warn!("{err:#}");
                    skipped.push(err);
                }
            }
        }
        (vocabulary, skipped)
    }

    pub fn extend(&mut self, other: Vocabulary) {
        self.words.extend(other.words);
        self.kanji.extend(other.kanji);
        self.used_words.extend(other.used_words);
        self.used_kanji.extend(other.used_kanji);
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn kanji(&self) -> &[Kanji] {
        &self.kanji
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.kanji.is_empty()
    }

    /// Finds words whose spelling or reading occurs in `text`, and kanji that occur in it.
    pub fn analyze(&self, text: &str) -> Analysis<'_> {
        let occurs = |needle: &str| !needle.is_empty() && text.contains(needle);
        Analysis {
            words: self
                .words
                .iter()
                .filter(|word| occurs(&word.word) || occurs(&word.reading))
                .collect(),
            kanji: self
                .kanji
                .iter()
                .filter(|kanji| occurs(&kanji.kanji))
                .collect(),
        }
    }

    /// Hint lines for `dialogue`, one per matched entry.
    pub fn hint_lines(&self, dialogue: &str) -> Vec<String> {
        let analysis = self.analyze(dialogue);
        let words = analysis
            .words
            .iter()
            .map(|word| format!("{} ({}) - {}", word.word, word.reading, word.meaning));
        let kanji = analysis
            .kanji
            .iter()
            .map(|kanji| format!("{} - {}", kanji.kanji, kanji.meaning));
        words.chain(kanji).collect()
    }

    /// HTML hint block for web hosts; empty when nothing matched.
    pub fn hint_html(&self, dialogue: &str) -> String {
        let analysis = self.analyze(dialogue);
        if analysis.total() == 0 {
            return String::new();
        }
        let mut html = String::from("<div class=\"learning-hint\"><strong>Studied words:</strong><br>");
        for word in &analysis.words {
            html.push_str(&format!(
                "<span class=\"word-hint\">{} ({}) - {}</span><br>",
                escape_html(&word.word),
                escape_html(&word.reading),
                escape_html(&word.meaning)
            ));
        }
        for kanji in &analysis.kanji {
            html.push_str(&format!(
                "<span class=\"kanji-hint\">{} - {}</span><br>",
                escape_html(&kanji.kanji),
                escape_html(&kanji.meaning)
            ));
        }
        html.push_str("</div>");
        html
    }

    pub fn mark_word_used(&mut self, id: impl Into<String>) {
        self.used_words.insert(id.into());
    }

    pub fn mark_kanji_used(&mut self, id: impl Into<String>) {
        self.used_kanji.insert(id.into());
    }

    pub fn usage_stats(&self) -> UsageStats {
        UsageStats {
            total_words: self.words.len(),
            used_words: self.used_words.len(),
            total_kanji: self.kanji.len(),
            used_kanji: self.used_kanji.len(),
        }
    }
}

impl DialogueAnnotator for Vocabulary {
    fn annotate(&self, dialogue: &str) -> Vec<String> {
        self.hint_lines(dialogue)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TRACKER: &str = r#"{
        "words": [
            {"id": "w1", "word": "学校", "reading": "がっこう", "meaning": "school", "level": "N5"},
            {"id": "w2", "word": "先生", "reading": "せんせい", "meaning": "teacher", "level": "N5"},
            {"id": "w3", "word": "", "reading": "", "meaning": "blank"}
        ],
        "kanji": [
            {"id": "k1", "kanji": "日", "meaning": "day, sun", "level": "N5"}
        ]
    }"#;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_json(TRACKER).unwrap()
    }

    #[test]
    fn matches_words_by_spelling_and_reading() {
        let vocabulary = vocabulary();
        let by_word = vocabulary.analyze("学校へ行きます");
        assert_eq!(by_word.words.len(), 1);
        assert_eq!(by_word.words[0].id, "w1");

        let by_reading = vocabulary.analyze("せんせい、おはよう");
        assert_eq!(by_reading.words.len(), 1);
        assert_eq!(by_reading.words[0].meaning, "teacher");
    }

    #[test]
    fn matches_kanji_and_skips_blank_entries() {
        let vocabulary = vocabulary();
        let analysis = vocabulary.analyze("今日は晴れ");
        assert!(analysis.words.is_empty());
        assert_eq!(analysis.kanji.len(), 1);
        assert_eq!(analysis.total(), 1);
        assert_eq!(vocabulary.analyze("nothing here").total(), 0);
    }

    #[test]
    fn annotates_dialogue_as_hint_lines() {
        let lines = vocabulary().annotate("先生、今日は学校ですか");
        assert_eq!(
            lines,
            vec![
                "学校 (がっこう) - school".to_string(),
                "先生 (せんせい) - teacher".to_string(),
                "日 - day, sun".to_string(),
            ]
        );
    }

    #[test]
    fn html_hint_escapes_entries() {
        let vocabulary = Vocabulary::new(
            vec![Word {
                word: "<b>".into(),
                reading: "x".into(),
                meaning: "\"bold\" & 'strong'".into(),
                ..Word::default()
            }],
            Vec::new(),
        );
        let html = vocabulary.hint_html("a <b> tag");
        assert!(html.contains("&lt;b&gt; (x) - &quot;bold&quot; &amp; &#039;strong&#039;"));
        assert_eq!(vocabulary.hint_html("plain"), "");
    }

    #[test]
    fn empty_tracker_yields_no_hints() {
        let vocabulary = Vocabulary::from_json("{}").unwrap();
        assert!(vocabulary.is_empty());
        assert!(vocabulary.annotate("学校").is_empty());
    }

    #[test]
    fn missing_tracker_is_skipped() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(r#"{"kanji": [{"kanji": "日", "meaning": "day"}]}"#.as_bytes())
            .unwrap();
        let missing = tmp.path().with_extension("missing.json");
        let (vocabulary, skipped) = Vocabulary::open_all(&[tmp.path(), missing.as_path()]);
        assert_eq!(vocabulary.kanji().len(), 1);
        assert!(vocabulary.words().is_empty());
        assert_eq!(skipped.len(), 1);
        assert!(format!("{:#}", skipped[0]).contains("unable to read tracker"));
        assert!(Vocabulary::open(&missing).is_err());
    }

    #[test]
    fn usage_stats_count_marked_entries() {
        let mut vocabulary = vocabulary();
        vocabulary.mark_word_used("w1");
        vocabulary.mark_word_used("w1");
        vocabulary.mark_kanji_used("k1");
        assert_eq!(
            vocabulary.usage_stats(),
            UsageStats {
                total_words: 3,
                used_words: 1,
                total_kanji: 1,
                used_kanji: 1,
            }
        );
    }
}
