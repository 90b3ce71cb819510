use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use super::core::Vocabulary;

/// Result of asking for the next word to play
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Word(String),
    /// Every word is either guessed already or was just played
    Exhausted,
}

/// Trait for word selection strategies
pub trait WordSelector: Send + Sync {
    /// Pick the next word, never one already guessed nor the previous word
    fn select_next(
        &self,
        vocabulary: &Vocabulary,
        guessed: &HashSet<String>,
        last_word: Option<&str>,
    ) -> Selection;
}

/// Uniform random selection over the remaining pool
pub struct RandomSelector;

impl WordSelector for RandomSelector {
    fn select_next(
        &self,
        vocabulary: &Vocabulary,
        guessed: &HashSet<String>,
        last_word: Option<&str>,
    ) -> Selection {
        select_next_with(&mut rand::thread_rng(), vocabulary, guessed, last_word)
    }
}

/// Words still eligible: vocabulary minus guessed words minus the last word
pub fn candidate_pool<'a>(
    vocabulary: &'a Vocabulary,
    guessed: &HashSet<String>,
    last_word: Option<&str>,
) -> Vec<&'a String> {
    vocabulary
        .words()
        .iter()
        .filter(|w| !guessed.contains(*w))
        .filter(|w| last_word != Some(w.as_str()))
        .collect()
}

/// Same as [`RandomSelector`] but drawing from the given RNG
pub fn select_next_with<R: Rng + ?Sized>(
    rng: &mut R,
    vocabulary: &Vocabulary,
    guessed: &HashSet<String>,
    last_word: Option<&str>,
) -> Selection {
    candidate_pool(vocabulary, guessed, last_word)
        .choose(rng)
        .map(|w| Selection::Word((*w).clone()))
        .unwrap_or(Selection::Exhausted)
}
