// Library surface for the CLI, headless frontends and integration tests.
pub mod app_dirs;
mod assets;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod hub;
pub mod lexicon;
pub mod logging;
pub mod registry;
pub mod round;
pub mod runtime;
pub mod session;
pub mod summary;
pub mod translator;
pub mod vocabulary;

pub use error::{GameError, RegistryError, TranslateError};
pub use events::{ChannelId, InboundEvent, InboundText, OutboundEvent, UserId};
pub use hub::{GameHub, SessionHandle};
pub use round::{GameServices, RoundOutcome, SessionEnd};
pub use summary::{GracefulEnd, SessionSummary};
