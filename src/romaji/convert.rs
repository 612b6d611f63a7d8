//! Incremental romaji-to-kana conversion.
//!
//! The caller owns the pending buffer: it appends each new keystroke and
//! hands the whole buffer to [`RomajiTable::convert`], which returns the
//! committed unit (if any) and the new pending buffer.

use super::moji::{ConvertedMoji, Moji};
use super::table::RomajiTable;

/// Syllabic ん committed by the "n + consonant" rule. Built in code rather
/// than looked up so the rule holds even under a user table that rebinds
/// "nn".
fn syllabic_n() -> Moji {
    Moji::new("n", "ん")
}

impl RomajiTable {
    /// Convert the pending romaji buffer, one step.
    ///
    /// In priority order:
    /// 1. an exact table key commits its unit and re-pends the unit's
    ///    remain ("kk" commits っ, pending "k");
    /// 2. a prefix of some longer key stays pending untouched;
    /// 3. "n" plus one non-completing character commits ん and carries the
    ///    trailing character forward ("nk" commits ん, pending "k");
    /// 4. a longer dead-end buffer collapses to its final character and the
    ///    rules re-apply ("dg" drops "d", then retries "g");
    /// 5. anything else stays pending untouched; untableable single
    ///    characters never commit and are the caller's problem.
    pub fn convert(&self, pending: &str) -> ConvertedMoji {
        let mut input = pending;
        loop {
            if let Some(moji) = self.get(input) {
                return ConvertedMoji::decided(moji.remain().unwrap_or(""), moji.clone());
            }
            if self.is_undecided(input) {
                return ConvertedMoji::undecided(input);
            }
            if input.starts_with('n') && input.chars().count() == 2 {
                return ConvertedMoji::decided(&input[1..], syllabic_n());
            }
            match input.char_indices().last() {
                // Collapse a dead multi-character buffer to its last
                // character and re-run; each pass strictly shrinks the
                // buffer, so this terminates.
                Some((last_start, _)) if last_start > 0 => input = &input[last_start..],
                _ => return ConvertedMoji::undecided(input),
            }
        }
    }
}
