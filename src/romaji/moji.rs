use crate::kana;

/// Output script requested from a committed kana unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Hiragana,
    Katakana,
    /// Half-width katakana.
    Hankaku,
    /// Pass-through used by abbrev entry; renders the romaji itself.
    Direct,
}

/// One kana unit from the romaji table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moji {
    first_romaji: String,
    kana: String,
    katakana: Option<String>,
    hankaku: Option<String>,
    remain: Option<String>,
}

impl Moji {
    pub fn new(first_romaji: impl Into<String>, kana: impl Into<String>) -> Self {
        Self {
            first_romaji: first_romaji.into(),
            kana: kana.into(),
            katakana: None,
            hankaku: None,
            remain: None,
        }
    }

    pub fn with_forms(
        first_romaji: impl Into<String>,
        kana: impl Into<String>,
        katakana: Option<String>,
        hankaku: Option<String>,
        remain: Option<String>,
    ) -> Self {
        Self {
            first_romaji: first_romaji.into(),
            kana: kana.into(),
            katakana,
            hankaku,
            remain,
        }
    }

    /// The minimal romaji that reintroduces this unit, e.g. "k" for か.
    /// Empty for units with no standalone consonant (small vowels and the
    /// like).
    pub fn first_romaji(&self) -> &str {
        &self.first_romaji
    }

    /// Hiragana form.
    pub fn kana(&self) -> &str {
        &self.kana
    }

    /// Romaji left pending after this unit commits ("kk" commits っ and
    /// leaves "k").
    pub fn remain(&self) -> Option<&str> {
        self.remain.as_deref()
    }

    /// Render in the requested script. Katakana and half-width forms fall
    /// back to conversion from the hiragana form when no explicit override
    /// was defined.
    pub fn render(&self, mode: InputMode) -> String {
        match mode {
            InputMode::Hiragana => self.kana.clone(),
            InputMode::Katakana => self
                .katakana
                .clone()
                .unwrap_or_else(|| kana::hiragana_to_katakana(&self.kana)),
            InputMode::Hankaku => self
                .hankaku
                .clone()
                .unwrap_or_else(|| kana::katakana_to_hankaku(&self.render(InputMode::Katakana))),
            InputMode::Direct => self.first_romaji.clone(),
        }
    }
}

/// Result of one conversion step over the pending romaji buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedMoji {
    /// Romaji still undecided after this step.
    pub pending: String,
    /// The unit committed by this step, if any.
    pub kakutei: Option<Moji>,
}

impl ConvertedMoji {
    pub(crate) fn undecided(pending: impl Into<String>) -> Self {
        Self {
            pending: pending.into(),
            kakutei: None,
        }
    }

    pub(crate) fn decided(pending: impl Into<String>, moji: Moji) -> Self {
        Self {
            pending: pending.into(),
            kakutei: Some(moji),
        }
    }
}
