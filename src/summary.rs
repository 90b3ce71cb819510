use chrono::{DateTime, Local};
use std::fmt;
use std::time::Duration;

use crate::session::GameSession;

/// Ways a session can end that earn the player a summary
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum GracefulEnd {
    VocabularyExhausted,
    DoubleTimeout,
    UserExit,
}

/// End-of-session statistics
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub reason: GracefulEnd,
    pub guessed_count: usize,
    pub total_rounds: u32,
    /// `None` when no round was completed
    pub accuracy: Option<f64>,
    pub elapsed: Duration,
}

/// `part / whole`, or `None` for an empty whole
pub fn ratio(part: usize, whole: u32) -> Option<f64> {
    match whole {
        positive if positive > 0 => Some(part as f64 / whole as f64),
        _ => None,
    }
}

pub fn summarize(session: &GameSession, reason: GracefulEnd, now: DateTime<Local>) -> SessionSummary {
    let guessed_count = session.guessed_count();
    let total_rounds = session.rounds_played;

    SessionSummary {
        reason,
        guessed_count,
        total_rounds,
        accuracy: ratio(guessed_count, total_rounds),
        elapsed: (now - session.started_at).to_std().unwrap_or_default(),
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 **Session Summary:**")?;
        writeln!(f, "🎯 Words Guessed Correctly: {}", self.guessed_count)?;
        writeln!(f, "🔄 Total Rounds Played: {}", self.total_rounds)?;
        match self.accuracy {
            Some(accuracy) => writeln!(f, "Accuracy: {:.1}%", accuracy * 100.0)?,
            None => writeln!(f, "Accuracy: n/a")?,
        }
        writeln!(f, "⏱️ Time Played: {}s", self.elapsed.as_secs())?;
        write!(f, "Thanks for playing!")
    }
}
