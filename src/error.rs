//! Error types for every concern of the game engine.
//!
//! Registry and translation errors are expected outcomes and carry enough
//! context to be shown to a player. `GameError` is the umbrella a session
//! worker returns; anything reaching the worker boundary ends that session
//! only.

use thiserror::Error;

use crate::events::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("user {0} already has an active game")]
    AlreadyActive(UserId),
    #[error("user {0} is not currently playing")]
    NotActive(UserId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("unsupported language `{0}`")]
    UnsupportedLanguage(String),
    #[error("no `{language}` translation for `{word}`")]
    MissingEntry { word: String, language: String },
    #[error("`{word}` translates to itself in `{language}`")]
    Untranslated { word: String, language: String },
    #[error("translation service failed: {0}")]
    Service(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("transport closed")]
    Closed,
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("embedded asset `{0}` not found")]
    NotFound(String),
    #[error("embedded asset `{0}` is not valid UTF-8")]
    NotUtf8(String),
    #[error("unable to parse embedded asset `{path}`")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to access config file")]
    Io(#[from] std::io::Error),
    #[error("invalid config file")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("failed to spawn session worker")]
    Spawn(#[source] std::io::Error),
}
