//! In-memory keyed multi-map of readings to candidate words.
//!
//! Mutation here is mechanism only: read-only policy and format-delimiter
//! policy live in [`super::FileDict`], so this store stays independently
//! testable.

use std::collections::HashMap;

use super::entry::{Annotation, Word};
use super::{Dict, DictError};

/// Reading → ordered candidate list, with an explicit reading order so
/// serialization is deterministic and `parse(serialize(s)) == s`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDict {
    entries: HashMap<String, Vec<Word>>,
    order: Vec<String>,
}

impl MemoryDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse SKK dictionary text. `;;`-comment lines and blank lines are
    /// skipped; every other line must be `yomi /word[;annotation]/.../`.
    /// Any malformed line fails the whole parse, and the caller keeps its
    /// previous store.
    pub fn parse(dict_id: &str, source: &str) -> Result<Self, DictError> {
        let mut dict = Self::new();
        for (idx, line) in source.lines().enumerate() {
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let malformed = || DictError::Parse {
                dict_id: dict_id.to_string(),
                line: idx + 1,
                content: line.to_string(),
            };

            let (yomi, rest) = line.split_once(' ').ok_or_else(malformed)?;
            let body = rest
                .strip_prefix('/')
                .and_then(|r| r.strip_suffix('/'))
                .ok_or_else(malformed)?;
            if yomi.is_empty() || body.is_empty() {
                return Err(malformed());
            }

            let mut words = Vec::new();
            for part in body.split('/') {
                let word = match part.split_once(';') {
                    Some((text, annotation)) => {
                        if text.is_empty() || annotation.is_empty() {
                            return Err(malformed());
                        }
                        Word::annotated(text, Annotation::new(dict_id, annotation))
                    }
                    None => {
                        if part.is_empty() {
                            return Err(malformed());
                        }
                        Word::new(part)
                    }
                };
                words.push(word);
            }
            // A duplicate reading keeps its original position; the later
            // line's candidates win wholesale.
            if dict.entries.insert(yomi.to_string(), words).is_none() {
                dict.order.push(yomi.to_string());
            }
        }
        Ok(dict)
    }

    /// Candidates under an exact reading; empty slice when absent.
    pub fn refer(&self, yomi: &str) -> &[Word] {
        self.entries.get(yomi).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Insert a word at the front of the reading's list. A word with the
    /// same text already in the list is moved to the front instead of
    /// duplicated (most-recently-used order); its annotation is refreshed
    /// from the incoming word.
    pub fn add(&mut self, yomi: &str, word: Word) {
        match self.entries.get_mut(yomi) {
            Some(words) => {
                if let Some(pos) = words.iter().position(|w| w.word == word.word) {
                    words.remove(pos);
                }
                words.insert(0, word);
            }
            None => {
                self.entries.insert(yomi.to_string(), vec![word]);
                self.order.push(yomi.to_string());
            }
        }
    }

    /// Remove the first candidate under `yomi` whose text equals `word`.
    /// Returns whether a removal occurred. A reading left with no
    /// candidates is dropped entirely, since serializing it would produce an
    /// unparseable line.
    pub fn delete(&mut self, yomi: &str, word: &str) -> bool {
        let Some(words) = self.entries.get_mut(yomi) else {
            return false;
        };
        let Some(pos) = words.iter().position(|w| w.word == word) else {
            return false;
        };
        words.remove(pos);
        if words.is_empty() {
            self.entries.remove(yomi);
            self.order.retain(|y| y != yomi);
        }
        true
    }

    /// Number of reading keys (not words); used for load diagnostics.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Readings in store order.
    pub fn readings(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl Dict for MemoryDict {
    fn refer(&self, yomi: &str) -> &[Word] {
        MemoryDict::refer(self, yomi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refer_absent_reading_is_empty() {
        let dict = MemoryDict::new();
        assert!(dict.refer("あ").is_empty());
    }

    #[test]
    fn test_add_inserts_at_front() {
        let mut dict = MemoryDict::new();
        dict.add("あ", Word::new("亜"));
        dict.add("あ", Word::new("阿"));
        let words: Vec<&str> = dict.refer("あ").iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["阿", "亜"]);
    }

    #[test]
    fn test_re_add_moves_to_front_without_duplicating() {
        let mut dict = MemoryDict::new();
        dict.add("あ", Word::new("亜"));
        dict.add("あ", Word::new("阿"));
        dict.add("あ", Word::new("亜"));
        let words: Vec<&str> = dict.refer("あ").iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["亜", "阿"]);
    }

    #[test]
    fn test_re_add_refreshes_annotation() {
        let mut dict = MemoryDict::new();
        dict.add("あ", Word::new("亜"));
        dict.add("あ", Word::annotated("亜", Annotation::new("user", "注釈")));
        let words = dict.refer("あ");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].annotation.as_ref().unwrap().text, "注釈");
    }

    #[test]
    fn test_delete_missing_word_returns_false() {
        let mut dict = MemoryDict::new();
        dict.add("あr", Word::new("有"));
        dict.add("あr", Word::new("在"));
        assert!(!dict.delete("あr", "或"));
        assert_eq!(dict.refer("あr").len(), 2);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut dict = MemoryDict::new();
        dict.add("あr", Word::new("有"));
        dict.add("あr", Word::new("在"));
        assert!(dict.delete("あr", "在"));
        let words: Vec<&str> = dict.refer("あr").iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["有"]);
    }

    #[test]
    fn test_delete_absent_reading_returns_false() {
        let mut dict = MemoryDict::new();
        assert!(!dict.delete("ない", "無"));
    }

    #[test]
    fn test_delete_last_word_drops_reading() {
        let mut dict = MemoryDict::new();
        dict.add("あ", Word::new("亜"));
        assert!(dict.delete("あ", "亜"));
        assert_eq!(dict.entry_count(), 0);
        assert_eq!(dict.readings().count(), 0);
    }

    #[test]
    fn test_entry_count_counts_readings_not_words() {
        let mut dict = MemoryDict::new();
        dict.add("あ", Word::new("亜"));
        dict.add("あ", Word::new("阿"));
        dict.add("い", Word::new("井"));
        assert_eq!(dict.entry_count(), 2);
    }

    #[test]
    fn test_parse_basic() {
        let source = ";; -*- mode: fundamental; coding: utf-8 -*-\nあ /亜/阿/\nい /井;annotation/";
        let dict = MemoryDict::parse("test", source).unwrap();
        assert_eq!(dict.entry_count(), 2);
        let words: Vec<&str> = dict.refer("あ").iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["亜", "阿"]);
        let i = dict.refer("い");
        assert_eq!(i[0].word, "井");
        let ann = i[0].annotation.as_ref().unwrap();
        assert_eq!(ann.text, "annotation");
        assert_eq!(ann.dict_id, "test");
    }

    #[test]
    fn test_parse_preserves_line_order() {
        let dict = MemoryDict::parse("test", "い /井/\nあ /亜/").unwrap();
        let readings: Vec<&str> = dict.readings().collect();
        assert_eq!(readings, ["い", "あ"]);
    }

    #[test]
    fn test_parse_duplicate_reading_last_wins() {
        let dict = MemoryDict::parse("test", "あ /亜/\nい /井/\nあ /阿/").unwrap();
        let words: Vec<&str> = dict.refer("あ").iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["阿"]);
        let readings: Vec<&str> = dict.readings().collect();
        assert_eq!(readings, ["あ", "い"]);
    }

    #[test]
    fn test_parse_error_carries_line_and_dict_id() {
        let err = MemoryDict::parse("broken.txt", "あ /亜/\nnot-an-entry").unwrap_err();
        match err {
            DictError::Parse {
                dict_id,
                line,
                content,
            } => {
                assert_eq!(dict_id, "broken.txt");
                assert_eq!(line, 2);
                assert_eq!(content, "not-an-entry");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unwrapped_candidates() {
        assert!(MemoryDict::parse("t", "あ 亜").is_err());
        assert!(MemoryDict::parse("t", "あ /亜").is_err());
        assert!(MemoryDict::parse("t", "あ //").is_err());
        assert!(MemoryDict::parse("t", "あ /亜//阿/").is_err());
    }
}
