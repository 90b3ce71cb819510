use chrono::{DateTime, Local};
use std::collections::HashSet;

/// Mutable state of one player's game, owned by that player's session worker
#[derive(Debug, Clone)]
pub struct GameSession {
    pub language: String,
    pub guessed_words: HashSet<String>,
    /// Consecutive timed-out attempts with no answer in between
    pub timeout_streak: u32,
    /// Rounds that finished with a correct or an exhausted-attempts answer
    pub rounds_played: u32,
    pub last_word: Option<String>,
    pub started_at: DateTime<Local>,
}

impl GameSession {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            guessed_words: HashSet::new(),
            timeout_streak: 0,
            rounds_played: 0,
            last_word: None,
            started_at: Local::now(),
        }
    }

    pub fn begin_round(&mut self, word: &str) {
        self.last_word = Some(word.to_string());
    }

    /// Any answer inside the deadline breaks the streak, right or wrong
    pub fn record_answer(&mut self) {
        self.timeout_streak = 0;
    }

    /// Returns the streak length including this timeout
    pub fn record_timeout(&mut self) -> u32 {
        self.timeout_streak += 1;
        self.timeout_streak
    }

    pub fn record_correct(&mut self, word: &str) {
        self.guessed_words.insert(word.to_string());
        self.rounds_played += 1;
    }

    pub fn record_incorrect(&mut self) {
        self.rounds_played += 1;
    }

    pub fn guessed_count(&self) -> usize {
        self.guessed_words.len()
    }
}
