use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::assets;
use crate::error::{AssetError, TranslateError};
use crate::vocabulary::Vocabulary;

/// Translation service the game asks once per round, without retries
pub trait Translator: Send + Sync {
    fn translate(&self, word: &str, language: &str) -> Result<String, TranslateError>;
}

/// Word-to-word table for one target language, as stored in `src/lang/glossary`
#[derive(Deserialize, Clone, Debug)]
pub struct Glossary {
    pub code: String,
    pub name: String,
    pub entries: HashMap<String, String>,
}

/// Translator backed by the glossaries shipped with the crate
#[derive(Clone, Debug, Default)]
pub struct GlossaryTranslator {
    glossaries: BTreeMap<String, Glossary>,
}

impl GlossaryTranslator {
    pub fn embedded() -> Result<Self, AssetError> {
        let glossaries = assets::json_files_in("glossary")
            .iter()
            .map(|path| assets::load_json::<Glossary>(path))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_glossaries(glossaries))
    }

    pub fn from_glossaries(glossaries: impl IntoIterator<Item = Glossary>) -> Self {
        let glossaries = glossaries
            .into_iter()
            .map(|g| (g.code.to_lowercase(), g))
            .collect();
        Self { glossaries }
    }

    pub fn supports(&self, language: &str) -> bool {
        self.glossaries.contains_key(&language.to_lowercase())
    }

    /// `(code, name)` pairs, sorted by code
    pub fn languages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.glossaries
            .values()
            .map(|g| (g.code.as_str(), g.name.as_str()))
    }
}

impl Translator for GlossaryTranslator {
    fn translate(&self, word: &str, language: &str) -> Result<String, TranslateError> {
        let glossary = self
            .glossaries
            .get(&language.to_lowercase())
            .ok_or_else(|| TranslateError::UnsupportedLanguage(language.to_string()))?;

        glossary
            .entries
            .get(&word.to_lowercase())
            .cloned()
            .ok_or_else(|| TranslateError::MissingEntry {
                word: word.to_string(),
                language: language.to_string(),
            })
    }
}

/// Translate `word`, treating a result equal to the word itself as a failure
pub fn translate_checked(
    translator: &dyn Translator,
    word: &str,
    language: &str,
) -> Result<String, TranslateError> {
    let translation = translator.translate(word, language)?;
    if translation.trim().to_lowercase() == word.trim().to_lowercase() {
        debug!(word, language, "translation round-tripped to the source word");
        return Err(TranslateError::Untranslated {
            word: word.to_string(),
            language: language.to_string(),
        });
    }
    Ok(translation)
}

/// A vocabulary word next to its translation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordCard {
    pub word: String,
    pub translation: String,
    pub language: String,
}

/// Pick any vocabulary word and translate it; `None` for an empty vocabulary
pub fn random_word<R: Rng + ?Sized>(
    rng: &mut R,
    vocabulary: &Vocabulary,
    translator: &dyn Translator,
    language: &str,
) -> Result<Option<WordCard>, TranslateError> {
    let Some(word) = vocabulary.words().choose(rng) else {
        return Ok(None);
    };

    let translation = translate_checked(translator, word, language)?;
    Ok(Some(WordCard {
        word: word.clone(),
        translation,
        language: language.to_string(),
    }))
}
