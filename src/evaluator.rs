use std::collections::HashSet;

use crate::lexicon::Lexicon;

/// Canonical form used on both sides of a comparison
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether `input` names `target` or one of its synonyms.
///
/// The target itself always counts, even when the synonym set is empty.
pub fn matches(input: &str, target: &str, synonyms: &HashSet<String>) -> bool {
    let answer = normalize(input);
    answer == normalize(target) || synonyms.contains(&answer)
}

/// Accepted answers for one round's word
#[derive(Debug, Clone)]
pub struct AnswerEvaluator {
    target: String,
    accepted: HashSet<String>,
}

impl AnswerEvaluator {
    pub fn new(target: &str, synonyms: HashSet<String>) -> Self {
        let mut accepted = HashSet::with_capacity(synonyms.len() * 2 + 1);
        for synonym in synonyms {
            let synonym = normalize(&synonym);
            // lemma-style entries like `domestic_dog` are typed with a space
            if synonym.contains('_') {
                accepted.insert(synonym.replace('_', " "));
            }
            accepted.insert(synonym);
        }
        accepted.insert(normalize(target));

        Self {
            target: target.to_string(),
            accepted,
        }
    }

    pub fn for_word(target: &str, lexicon: &dyn Lexicon) -> Self {
        Self::new(target, lexicon.synonyms(target))
    }

    pub fn accepts(&self, input: &str) -> bool {
        matches(input, &self.target, &self.accepted)
    }

    /// First letter of the target word
    pub fn hint(&self) -> Option<char> {
        self.target.chars().next()
    }
}
