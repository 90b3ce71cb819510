//! Event shapes exchanged with the chat transport.

use std::sync::mpsc::Sender;

use crate::error::SinkError;
use crate::summary::SessionSummary;

pub type UserId = u64;
pub type ChannelId = u64;

/// A chat message as the game sees it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundText {
    pub author: UserId,
    pub channel: ChannelId,
    pub text: String,
}

impl InboundText {
    pub fn new(author: UserId, channel: ChannelId, text: impl Into<String>) -> Self {
        Self {
            author,
            channel,
            text: text.into(),
        }
    }
}

/// Everything the transport can ask of the game
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    StartGame {
        user: UserId,
        channel: ChannelId,
        language: String,
    },
    ExitGame {
        user: UserId,
    },
    Text(InboundText),
}

/// Messages for the transport to render
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundEvent {
    Prompt(String),
    Hint(String),
    Reveal(String),
    Summary(SessionSummary),
    Notice(String),
}

impl OutboundEvent {
    pub fn text(&self) -> String {
        match self {
            OutboundEvent::Prompt(t)
            | OutboundEvent::Hint(t)
            | OutboundEvent::Reveal(t)
            | OutboundEvent::Notice(t) => t.clone(),
            OutboundEvent::Summary(summary) => summary.to_string(),
        }
    }
}

/// Outbound event addressed to one player in one channel
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub user: UserId,
    pub channel: ChannelId,
    pub event: OutboundEvent,
}

/// Where a session sends what the player should see
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, user: UserId, channel: ChannelId, event: OutboundEvent)
        -> Result<(), SinkError>;
}

/// Sink forwarding deliveries over a channel, used by headless frontends and tests
pub struct ChannelSink {
    tx: Sender<Delivery>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Delivery>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(
        &self,
        user: UserId,
        channel: ChannelId,
        event: OutboundEvent,
    ) -> Result<(), SinkError> {
        self.tx
            .send(Delivery {
                user,
                channel,
                event,
            })
            .map_err(|_| SinkError::Closed)
    }
}
