use itertools::Itertools;
use serde::Deserialize;

use crate::assets;
use crate::error::AssetError;

/// On-disk shape of a word list under `src/lang`
#[derive(Deserialize, Clone, Debug)]
struct WordList {
    name: String,
    #[allow(dead_code)]
    size: u32,
    words: Vec<String>,
}

/// Fixed set of canonical English words a game draws from.
///
/// Words are trimmed, lower-cased and deduplicated on construction, keeping
/// the order of first appearance. A vocabulary never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    name: String,
    words: Vec<String>,
}

impl Vocabulary {
    /// Load one of the word lists shipped with the crate, e.g. `"easy"`
    pub fn embedded(name: &str) -> Result<Self, AssetError> {
        let list: WordList = assets::load_json(&format!("{name}.json"))?;
        Ok(Self::from_words(list.name, list.words))
    }

    pub fn from_words<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .unique()
            .collect();

        Self {
            name: name.into(),
            words,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_easy_list() {
        let vocab = Vocabulary::embedded("easy").unwrap();

        assert_eq!(vocab.name(), "easy");
        // The raw list repeats a handful of words and capitalises one
        assert_eq!(vocab.len(), 172);
        assert!(vocab.contains("america"));
        assert!(!vocab.contains("America"));
    }

    #[test]
    fn test_embedded_unknown_list() {
        let result = Vocabulary::embedded("klingon");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_from_words_normalizes_and_dedupes() {
        let vocab = Vocabulary::from_words("test", ["Dog", " cat ", "dog", "", "CAT", "owl"]);

        assert_eq!(vocab.words(), ["dog", "cat", "owl"]);
        assert_eq!(vocab.len(), 3);
        assert!(!vocab.is_empty());
    }

    #[test]
    fn test_empty_vocabulary() {
        let vocab = Vocabulary::from_words("empty", Vec::<String>::new());
        assert!(vocab.is_empty());
    }
}
