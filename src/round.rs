//! The per-session game loop.
//!
//! A [`RoundController`] owns one player's [`GameSession`] and plays rounds
//! until the game ends: pick a word, translate it, then wait for up to
//! [`MAX_ATTEMPTS`] answers. A timeout reveals the word and waits again for
//! the same word without using up an attempt; [`TIMEOUT_LIMIT`] timeouts in a
//! row end the game. Leaving the game is noticed at the top of each round and
//! whenever a wait returns.

use chrono::Local;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{SinkError, TranslateError};
use crate::evaluator::AnswerEvaluator;
use crate::events::{ChannelId, EventSink, OutboundEvent, UserId};
use crate::lexicon::Lexicon;
use crate::registry::{SessionRegistry, SessionTicket};
use crate::runtime::{wait_for_answer, AnswerFilter, AnswerSource, Wait};
use crate::session::GameSession;
use crate::summary::{summarize, GracefulEnd, SessionSummary};
use crate::translator::{translate_checked, Translator};
use crate::vocabulary::{Selection, Vocabulary, WordSelector};

pub const MAX_ATTEMPTS: usize = 3;
/// Zero-based attempt after whose miss the first letter is shown
pub const HINT_ATTEMPT: usize = 1;
pub const TIMEOUT_LIMIT: u32 = 2;
pub const DEFAULT_ANSWER_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared collaborators every session works with
#[derive(Clone)]
pub struct GameServices {
    pub vocabulary: Arc<Vocabulary>,
    pub selector: Arc<dyn WordSelector>,
    pub translator: Arc<dyn Translator>,
    pub lexicon: Arc<dyn Lexicon>,
    pub sink: Arc<dyn EventSink>,
    pub registry: Arc<SessionRegistry>,
    pub answer_timeout: Duration,
}

/// Who a session belongs to and where it is played
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seat {
    pub user: UserId,
    pub channel: ChannelId,
    pub ticket: SessionTicket,
}

/// How a single round finished
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Correct,
    Incorrect,
    /// The timeout streak reached [`TIMEOUT_LIMIT`]
    TimedOut,
    Exhausted,
    TranslationFailed(TranslateError),
    /// The player left while the round was running
    Exited,
}

/// How a whole session finished
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEnd {
    Graceful(SessionSummary),
    /// Translation failed; the session is dropped without a summary
    Aborted(TranslateError),
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::Graceful(summary) => write!(f, "{}", summary.reason),
            SessionEnd::Aborted(err) => write!(f, "TranslationFailed ({err})"),
        }
    }
}

pub struct RoundController<S: AnswerSource> {
    services: GameServices,
    seat: Seat,
    session: GameSession,
    answers: S,
}

impl<S: AnswerSource> RoundController<S> {
    pub fn new(services: GameServices, seat: Seat, session: GameSession, answers: S) -> Self {
        Self {
            services,
            seat,
            session,
            answers,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Play rounds until the session reaches a terminal state
    pub fn run(mut self) -> Result<SessionEnd, SinkError> {
        loop {
            if !self.still_active() {
                return self.finish(GracefulEnd::UserExit);
            }

            match self.play_round()? {
                RoundOutcome::Correct | RoundOutcome::Incorrect => continue,
                RoundOutcome::TimedOut => return self.finish(GracefulEnd::DoubleTimeout),
                RoundOutcome::Exited => return self.finish(GracefulEnd::UserExit),
                RoundOutcome::Exhausted => {
                    self.emit(OutboundEvent::Notice(
                        "🎉 You've guessed all the words in this session! Well done!".into(),
                    ))?;
                    return self.finish(GracefulEnd::VocabularyExhausted);
                }
                RoundOutcome::TranslationFailed(err) => {
                    warn!(user = self.seat.user, error = %err, "translation failed, aborting session");
                    self.emit(OutboundEvent::Notice(
                        "❌ Couldn't translate the word. Please try again.".into(),
                    ))?;
                    return Ok(SessionEnd::Aborted(err));
                }
            }
        }
    }

    /// Play one round: select, translate, then collect answers
    pub fn play_round(&mut self) -> Result<RoundOutcome, SinkError> {
        let word = match self.services.selector.select_next(
            &self.services.vocabulary,
            &self.session.guessed_words,
            self.session.last_word.as_deref(),
        ) {
            Selection::Word(word) => word,
            Selection::Exhausted => return Ok(RoundOutcome::Exhausted),
        };
        self.session.begin_round(&word);

        let language = self.session.language.clone();
        let translation =
            match translate_checked(self.services.translator.as_ref(), &word, &language) {
                Ok(translation) => translation,
                Err(err) => return Ok(RoundOutcome::TranslationFailed(err)),
            };
        if !self.still_active() {
            return Ok(RoundOutcome::Exited);
        }
        debug!(user = self.seat.user, %word, %translation, "round started");

        // only messages sent after the prompt count as answers to it
        let stale = self.answers.discard_pending();
        if stale > 0 {
            debug!(user = self.seat.user, stale, "dropped messages sent before the prompt");
        }

        self.emit(OutboundEvent::Prompt(format!(
            "✨ Guess the English meaning of the word **`{translation}`** (in {language}). You have {MAX_ATTEMPTS} attempts!"
        )))?;

        let evaluator = AnswerEvaluator::for_word(&word, self.services.lexicon.as_ref());
        let mut attempt = 0;
        while attempt < MAX_ATTEMPTS {
            match self.await_answer() {
                Wait::Closed => return Ok(RoundOutcome::Exited),
                Wait::TimedOut => {
                    if !self.still_active() {
                        return Ok(RoundOutcome::Exited);
                    }
                    let streak = self.session.record_timeout();
                    debug!(user = self.seat.user, streak, "answer timed out");
                    self.emit(OutboundEvent::Reveal(format!(
                        "⏳ Time's up! The correct answer was `{word}`."
                    )))?;
                    if streak >= TIMEOUT_LIMIT {
                        self.emit(OutboundEvent::Notice(
                            "🛑 You've run out of time twice in a row! Ending your session."
                                .into(),
                        ))?;
                        return Ok(RoundOutcome::TimedOut);
                    }
                }
                Wait::Answer(answer) => {
                    self.session.record_answer();
                    if evaluator.accepts(&answer) {
                        if !self.emit_if_active(OutboundEvent::Notice(format!(
                            "✅ Correct! The word **`{translation}`** in **{language}** means `{word}` in English."
                        )))? {
                            return Ok(RoundOutcome::Exited);
                        }
                        self.session.record_correct(&word);
                        return Ok(RoundOutcome::Correct);
                    }

                    if attempt == HINT_ATTEMPT {
                        if let Some(first) = evaluator.hint() {
                            if !self.emit_if_active(OutboundEvent::Hint(format!(
                                "💡 Hint: The word starts with **`{first}`**."
                            )))? {
                                return Ok(RoundOutcome::Exited);
                            }
                        }
                    }
                    attempt += 1;
                    if attempt < MAX_ATTEMPTS
                        && !self.emit_if_active(OutboundEvent::Notice(format!(
                            "❌ Incorrect! You have {} attempts left.",
                            MAX_ATTEMPTS - attempt
                        )))?
                    {
                        return Ok(RoundOutcome::Exited);
                    }
                }
            }
        }

        self.emit(OutboundEvent::Reveal(format!(
            "❌ Out of attempts! The correct answer was `{word}`."
        )))?;
        self.session.record_incorrect();
        Ok(RoundOutcome::Incorrect)
    }

    fn await_answer(&self) -> Wait {
        let filter = AnswerFilter {
            author: self.seat.user,
            channel: self.seat.channel,
        };
        wait_for_answer(&self.answers, self.services.answer_timeout, |text| {
            filter.accepts(text) && self.still_active()
        })
    }

    fn still_active(&self) -> bool {
        self.services
            .registry
            .holds(self.seat.user, self.seat.ticket)
    }

    fn finish(&self, reason: GracefulEnd) -> Result<SessionEnd, SinkError> {
        let summary = summarize(&self.session, reason, Local::now());
        info!(
            user = self.seat.user,
            %reason,
            guessed = summary.guessed_count,
            rounds = summary.total_rounds,
            "session finished"
        );
        self.emit(OutboundEvent::Summary(summary.clone()))?;
        Ok(SessionEnd::Graceful(summary))
    }

    /// Emit only while the player is still in the game; false once they left
    fn emit_if_active(&self, event: OutboundEvent) -> Result<bool, SinkError> {
        if !self.still_active() {
            return Ok(false);
        }
        self.emit(event)?;
        Ok(true)
    }

    fn emit(&self, event: OutboundEvent) -> Result<(), SinkError> {
        self.services
            .sink
            .emit(self.seat.user, self.seat.channel, event)
    }
}
