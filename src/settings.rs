//! Engine configuration loaded from TOML.
//!
//! Pure data: which kana-rule definition to use and which dictionary files
//! to open with what encoding and write policy. Composing the dictionaries
//! (precedence, aggregation) is the host's job.

use std::path::PathBuf;

use encoding_rs::Encoding;
use serde::Deserialize;

use crate::dict::{DictError, FileDict, FsStorage};
use crate::romaji::{KanaRuleError, RomajiTable};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub kana_rule: KanaRuleSettings,
    #[serde(default)]
    pub dictionaries: Vec<DictionarySettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KanaRuleSettings {
    /// Definition file overriding the embedded kana rule.
    pub file: Option<PathBuf>,
}

impl Settings {
    /// Build the romaji table: the configured definition file if set, the
    /// embedded default otherwise.
    pub fn romaji_table(&self) -> Result<RomajiTable, KanaRuleError> {
        match &self.kana_rule.file {
            Some(path) => RomajiTable::from_file(path),
            None => Ok(RomajiTable::default_table()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySettings {
    pub path: PathBuf,
    #[serde(default = "default_encoding_label")]
    pub encoding: String,
    #[serde(default = "default_readonly")]
    pub readonly: bool,
    /// Resolved from `encoding` during parse.
    #[serde(skip)]
    resolved: Option<&'static Encoding>,
}

fn default_encoding_label() -> String {
    "utf-8".to_string()
}

fn default_readonly() -> bool {
    true
}

impl DictionarySettings {
    /// The resolved character encoding for this dictionary.
    pub fn resolved_encoding(&self) -> &'static Encoding {
        self.resolved.unwrap_or(encoding_rs::UTF_8)
    }

    /// Open the configured dictionary over plain filesystem storage.
    pub fn open(&self) -> Result<FileDict, DictError> {
        FileDict::open(
            &self.path,
            self.resolved_encoding(),
            self.readonly,
            Box::new(FsStorage),
        )
    }
}

/// Parse and validate settings TOML. Every dictionary's encoding label must
/// resolve via WHATWG encoding labels ("utf-8", "euc-jp", ...).
pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut settings: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    for dictionary in &mut settings.dictionaries {
        let label = dictionary.encoding.trim();
        let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            SettingsError::InvalidValue {
                field: format!("dictionaries.{}.encoding", dictionary.path.display()),
                reason: format!("unknown encoding label {label:?}"),
            }
        })?;
        dictionary.resolved = Some(encoding);
    }
    Ok(settings)
}

/// The embedded defaults: no dictionaries, embedded kana rule.
pub fn default_settings() -> Settings {
    parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded settings TOML must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let settings = default_settings();
        assert!(settings.dictionaries.is_empty());
        assert!(settings.kana_rule.file.is_none());
    }

    #[test]
    fn parse_dictionary_list() {
        let toml = r#"
[[dictionaries]]
path = "SKK-JISYO.L"
encoding = "euc-jp"

[[dictionaries]]
path = "userdict.txt"
encoding = "utf-8"
readonly = false
"#;
        let settings = parse_settings_toml(toml).unwrap();
        assert_eq!(settings.dictionaries.len(), 2);

        let system = &settings.dictionaries[0];
        assert_eq!(system.resolved_encoding(), encoding_rs::EUC_JP);
        assert!(system.readonly, "readonly defaults to true");

        let user = &settings.dictionaries[1];
        assert_eq!(user.resolved_encoding(), encoding_rs::UTF_8);
        assert!(!user.readonly);
    }

    #[test]
    fn parse_kana_rule_override() {
        let toml = r#"
[kana_rule]
file = "/etc/skk/kana-rule.conf"
"#;
        let settings = parse_settings_toml(toml).unwrap();
        assert_eq!(
            settings.kana_rule.file.as_deref(),
            Some(std::path::Path::new("/etc/skk/kana-rule.conf"))
        );
    }

    #[test]
    fn error_unknown_encoding_label() {
        let toml = r#"
[[dictionaries]]
path = "dict.txt"
encoding = "not-an-encoding"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("dict.txt"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn default_settings_use_embedded_rule() {
        let table = default_settings().romaji_table().unwrap();
        assert!(table.get("kya").is_some());
    }

    #[test]
    fn open_configured_dictionary_and_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let dict_path = dir.path().join("userdict.txt");
        std::fs::write(
            &dict_path,
            ";; -*- mode: fundamental; coding: utf-8 -*-\nあ /亜/",
        )
        .unwrap();
        let rule_path = dir.path().join("kana-rule.conf");
        std::fs::write(&rule_path, "a,あ\nka,か\n").unwrap();

        let toml = format!(
            r#"
[kana_rule]
file = {rule_path:?}

[[dictionaries]]
path = {dict_path:?}
encoding = "utf-8"
readonly = false
"#
        );
        let settings = parse_settings_toml(&toml).unwrap();

        let table = settings.romaji_table().unwrap();
        assert_eq!(table.get("ka").unwrap().kana(), "か");

        let dict = settings.dictionaries[0].open().unwrap();
        assert!(!dict.readonly());
        assert_eq!(dict.refer("あ")[0].word, "亜");
    }
}
