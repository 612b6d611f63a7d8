/// Annotation text attached to a candidate word, tagged with the dictionary
/// it came from. Metadata only; word identity is the word text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub dict_id: String,
    pub text: String,
}

impl Annotation {
    pub fn new(dict_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            dict_id: dict_id.into(),
            text: text.into(),
        }
    }
}

/// One candidate word under a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub word: String,
    pub annotation: Option<Annotation>,
}

impl Word {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            annotation: None,
        }
    }

    pub fn annotated(word: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            word: word.into(),
            annotation: Some(annotation),
        }
    }
}
