use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::assets;
use crate::error::AssetError;

/// Source of acceptable English alternatives for a word
pub trait Lexicon: Send + Sync {
    /// Lower-cased synonyms of `word`; empty when none are known
    fn synonyms(&self, word: &str) -> HashSet<String>;
}

/// Lexicon that knows no synonyms, so only the word itself is accepted
pub struct NoSynonyms;

impl Lexicon for NoSynonyms {
    fn synonyms(&self, _word: &str) -> HashSet<String> {
        HashSet::new()
    }
}

#[derive(Deserialize, Clone, Debug)]
struct ThesaurusFile {
    #[allow(dead_code)]
    name: String,
    entries: HashMap<String, Vec<String>>,
}

/// Static synonym table in WordNet lemma style (`domestic_dog`)
#[derive(Clone, Debug, Default)]
pub struct Thesaurus {
    entries: HashMap<String, Vec<String>>,
}

impl Thesaurus {
    pub fn embedded() -> Result<Self, AssetError> {
        let file: ThesaurusFile = assets::load_json("thesaurus.json")?;
        Ok(Self::from_entries(file.entries))
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(word, synonyms)| {
                let synonyms = synonyms
                    .into_iter()
                    .map(|s| s.as_ref().to_lowercase())
                    .collect();
                (word.as_ref().to_lowercase(), synonyms)
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lexicon for Thesaurus {
    fn synonyms(&self, word: &str) -> HashSet<String> {
        self.entries
            .get(&word.to_lowercase())
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }
}
