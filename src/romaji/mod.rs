mod convert;
mod moji;
mod table;

pub use moji::{ConvertedMoji, InputMode, Moji};
pub use table::{KanaRuleError, RomajiTable, DEFAULT_KANA_RULE};
