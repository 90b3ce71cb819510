use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::events::{ChannelId, InboundText, UserId};

/// Source of chat messages for one session
pub trait AnswerSource: Send + 'static {
    /// Block for up to `timeout` waiting for a message.
    /// Returns Ok(text) if one arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<InboundText, RecvTimeoutError>;

    /// Drop everything already queued without blocking; returns how many were dropped
    fn discard_pending(&self) -> usize;
}

/// Production source: the session's mailbox fed by the registry
pub struct MailboxSource {
    rx: Receiver<InboundText>,
}

impl MailboxSource {
    pub fn new(rx: Receiver<InboundText>) -> Self {
        Self { rx }
    }
}

impl AnswerSource for MailboxSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<InboundText, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn discard_pending(&self) -> usize {
        self.rx.try_iter().count()
    }
}

/// Outcome of waiting for one answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Wait {
    Answer(String),
    TimedOut,
    /// The mailbox was dropped, i.e. the player left
    Closed,
}

/// Which messages count as answers: same author, same channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerFilter {
    pub author: UserId,
    pub channel: ChannelId,
}

impl AnswerFilter {
    pub fn accepts(&self, text: &InboundText) -> bool {
        text.author == self.author && text.channel == self.channel
    }
}

/// Wait until `deadline` elapses for a message satisfying `accept`.
///
/// Rejected messages are dropped and do not extend the deadline.
pub fn wait_for_answer<S, F>(source: &S, deadline: Duration, accept: F) -> Wait
where
    S: AnswerSource + ?Sized,
    F: Fn(&InboundText) -> bool,
{
    let until = Instant::now() + deadline;
    loop {
        let remaining = until.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Wait::TimedOut;
        }

        match source.recv_timeout(remaining) {
            Ok(text) if accept(&text) => return Wait::Answer(text.text),
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) => return Wait::TimedOut,
            Err(RecvTimeoutError::Disconnected) => return Wait::Closed,
        }
    }
}
