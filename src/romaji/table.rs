//! Romaji table construction from a kana-rule definition source.
//!
//! Each non-empty, non-`#` line is a comma-separated record of 2–5 fields:
//! `romaji,kana[,katakana[,hankaku[,remain]]]`. A literal comma inside a
//! field is written as `&comma;` and unescaped after splitting. A malformed
//! record fails the whole load with its 1-based line number; a partially
//! built table is never returned.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use super::moji::Moji;

/// Embedded default definition, used when no user rule file is configured.
pub const DEFAULT_KANA_RULE: &str = include_str!("kana-rule.conf");

const COMMA_ESCAPE: &str = "&comma;";

#[derive(Debug, thiserror::Error)]
pub enum KanaRuleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("line {0}: record needs at least a romaji key and a kana form")]
    TooFewFields(usize),
    #[error("line {0}: record has more than five fields")]
    TooManyFields(usize),
    #[error("line {0}: empty field")]
    EmptyField(usize),
    #[error("definition source contains no records")]
    Empty,
}

/// Immutable romaji-to-kana mapping plus the set of prefixes that may still
/// grow into a longer key.
#[derive(Debug)]
pub struct RomajiTable {
    table: HashMap<String, Moji>,
    undecided_inputs: HashSet<String>,
}

impl RomajiTable {
    /// Build the table from the embedded default rule.
    pub fn default_table() -> Self {
        Self::parse(DEFAULT_KANA_RULE).expect("embedded kana-rule.conf must be valid")
    }

    /// Build the table from a user-provided definition file.
    pub fn from_file(path: &Path) -> Result<Self, KanaRuleError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parse a definition source. Duplicate keys are allowed; the last
    /// record wins.
    pub fn parse(source: &str) -> Result<Self, KanaRuleError> {
        let mut table = HashMap::new();
        let mut undecided_inputs = HashSet::new();

        for (idx, line) in source.lines().enumerate() {
            let line_number = idx + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<String> = line
                .split(',')
                .map(|f| f.replace(COMMA_ESCAPE, ","))
                .collect();
            if fields.len() < 2 {
                return Err(KanaRuleError::TooFewFields(line_number));
            }
            if fields.len() > 5 {
                return Err(KanaRuleError::TooManyFields(line_number));
            }
            if fields.iter().any(|f| f.is_empty()) {
                return Err(KanaRuleError::EmptyField(line_number));
            }

            let key = fields[0].clone();
            // Five-field records name the remain explicitly, and it doubles
            // as the first-romaji; otherwise the key's first character is it.
            let first_romaji = if fields.len() == 5 {
                fields[4].clone()
            } else {
                key.chars().next().map(String::from).unwrap_or_default()
            };
            let remain = (fields.len() == 5).then(|| fields[4].clone());
            let moji = Moji::with_forms(
                first_romaji,
                fields[1].clone(),
                fields.get(2).cloned(),
                fields.get(3).cloned(),
                remain,
            );

            if key.chars().count() > 1 {
                let prefix: String = {
                    let mut chars: Vec<char> = key.chars().collect();
                    chars.pop();
                    chars.into_iter().collect()
                };
                undecided_inputs.insert(prefix);
            }
            table.insert(key, moji);
        }

        if table.is_empty() {
            return Err(KanaRuleError::Empty);
        }
        Ok(Self {
            table,
            undecided_inputs,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Moji> {
        self.table.get(key)
    }

    /// Whether `input` could still grow into a table key.
    pub fn is_undecided(&self, input: &str) -> bool {
        self.undecided_inputs.contains(input)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::romaji::moji::InputMode;

    #[test]
    fn parse_default_rule() {
        let table = RomajiTable::default_table();
        assert!(table.len() > 190, "expected 190+ records, got {}", table.len());
        assert_eq!(table.get("ka").unwrap().kana(), "か");
        assert_eq!(table.get("kya").unwrap().kana(), "きゃ");
        assert_eq!(table.get("nn").unwrap().kana(), "ん");
    }

    #[test]
    fn default_rule_undecided_prefixes() {
        let table = RomajiTable::default_table();
        for prefix in ["k", "ky", "s", "sh", "ch", "ts", "x", "xt", "xts", "n"] {
            assert!(table.is_undecided(prefix), "{prefix} should be undecided");
        }
        assert!(!table.is_undecided("nk"));
        assert!(!table.is_undecided("a"));
    }

    #[test]
    fn default_rule_sokuon_remain() {
        let table = RomajiTable::default_table();
        let kk = table.get("kk").unwrap();
        assert_eq!(kk.kana(), "っ");
        assert_eq!(kk.remain(), Some("k"));
        assert_eq!(kk.first_romaji(), "k");
    }

    #[test]
    fn comma_escape_in_key() {
        let table = RomajiTable::default_table();
        assert_eq!(table.get(",").unwrap().kana(), "、");
        assert_eq!(table.get(".").unwrap().kana(), "。");
    }

    #[test]
    fn first_romaji_defaults_to_first_key_char() {
        let table = RomajiTable::parse("sha,しゃ\n").unwrap();
        assert_eq!(table.get("sha").unwrap().first_romaji(), "s");
    }

    #[test]
    fn katakana_override_from_third_field() {
        let table = RomajiTable::parse("vu,う゛,ヴ\n").unwrap();
        assert_eq!(table.get("vu").unwrap().render(InputMode::Katakana), "ヴ");
    }

    #[test]
    fn error_too_few_fields() {
        let err = RomajiTable::parse("a,あ\nka\n").unwrap_err();
        assert!(matches!(err, KanaRuleError::TooFewFields(2)));
    }

    #[test]
    fn error_empty_field() {
        let err = RomajiTable::parse("a,あ\nka,\n").unwrap_err();
        assert!(matches!(err, KanaRuleError::EmptyField(2)));
    }

    #[test]
    fn error_too_many_fields() {
        let err = RomajiTable::parse("kk,っ,ッ,ｯ,k,extra\n").unwrap_err();
        assert!(matches!(err, KanaRuleError::TooManyFields(1)));
    }

    #[test]
    fn error_empty_source() {
        let err = RomajiTable::parse("# only a comment\n").unwrap_err();
        assert!(matches!(err, KanaRuleError::Empty));
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let table = RomajiTable::parse("# comment\n\na,あ\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn last_record_wins_on_duplicate_key() {
        let table = RomajiTable::parse("a,あ\na,ア\n").unwrap();
        assert_eq!(table.get("a").unwrap().kana(), "ア");
    }
}
