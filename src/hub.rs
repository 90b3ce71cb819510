//! Entry point for transports: turns inbound events into session workers.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, info_span};

use crate::error::{GameError, RegistryError};
use crate::events::{ChannelId, InboundEvent, InboundText, OutboundEvent, UserId};
use crate::registry::SessionTicket;
use crate::round::{GameServices, RoundController, Seat, SessionEnd};
use crate::runtime::MailboxSource;
use crate::session::GameSession;

/// Running session; joining yields how it ended, `None` if the worker failed
#[derive(Debug)]
pub struct SessionHandle {
    pub user: UserId,
    pub ticket: SessionTicket,
    worker: JoinHandle<Option<SessionEnd>>,
}

impl SessionHandle {
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    pub fn join(self) -> Option<SessionEnd> {
        self.worker.join().ok().flatten()
    }
}

pub struct GameHub {
    services: GameServices,
}

impl GameHub {
    pub fn new(services: GameServices) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &GameServices {
        &self.services
    }

    /// Dispatch one transport event; session workers are left detached
    pub fn handle(&self, event: InboundEvent) -> Result<(), GameError> {
        match event {
            InboundEvent::StartGame {
                user,
                channel,
                language,
            } => self.start_game(user, channel, &language).map(|_| ()),
            InboundEvent::ExitGame { user } => Ok(self.exit_game(user)?),
            InboundEvent::Text(text) => {
                self.submit(text);
                Ok(())
            }
        }
    }

    /// Register `user` and spawn the worker running their game.
    ///
    /// `language` is expected to be validated by the caller.
    pub fn start_game(
        &self,
        user: UserId,
        channel: ChannelId,
        language: &str,
    ) -> Result<SessionHandle, GameError> {
        let (tx, rx) = mpsc::channel();
        let ticket = self.services.registry.start(user, tx)?;

        let seat = Seat {
            user,
            channel,
            ticket,
        };
        let greeting = self.services.sink.emit(
            user,
            channel,
            OutboundEvent::Notice(
                "🎮 Starting the word guessing game! Type `/exit` anytime to stop.".into(),
            ),
        );
        if let Err(err) = greeting {
            self.services.registry.release(user, ticket);
            return Err(err.into());
        }

        let session = GameSession::new(language);
        let services = self.services.clone();

        let spawned = thread::Builder::new()
            .name(format!("lingo-session-{user}"))
            .spawn(move || run_worker(services, seat, session, MailboxSource::new(rx)));

        match spawned {
            Ok(worker) => Ok(SessionHandle {
                user,
                ticket,
                worker,
            }),
            Err(err) => {
                self.services.registry.release(user, ticket);
                Err(GameError::Spawn(err))
            }
        }
    }

    /// Ask `user`'s game to stop; it finishes at the next check
    pub fn exit_game(&self, user: UserId) -> Result<(), RegistryError> {
        self.services.registry.stop(user)?;
        info!(user, "exit requested");
        Ok(())
    }

    /// Route a chat message to its author's game; false when they have none
    pub fn submit(&self, text: InboundText) -> bool {
        self.services.registry.deliver(text)
    }

    pub fn is_active(&self, user: UserId) -> bool {
        self.services.registry.is_active(user)
    }
}

/// Removes the worker's registration on every exit path, unwinding included
struct Registration {
    services: GameServices,
    seat: Seat,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.services
            .registry
            .release(self.seat.user, self.seat.ticket);
    }
}

fn run_worker(
    services: GameServices,
    seat: Seat,
    session: GameSession,
    answers: MailboxSource,
) -> Option<SessionEnd> {
    let span = info_span!("session", user = seat.user, language = %session.language);
    let _enter = span.enter();
    let _registration = Registration {
        services: services.clone(),
        seat,
    };
    info!("session started");

    let sink = services.sink.clone();
    let controller = RoundController::new(services, seat, session, answers);
    let failure = match panic::catch_unwind(AssertUnwindSafe(|| controller.run())) {
        Ok(Ok(end)) => return Some(end),
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_message(&*payload),
    };

    error!(error = %failure, "session terminated by internal error");
    let _ = sink.emit(
        seat.user,
        seat.channel,
        OutboundEvent::Notice(
            "❌ An unexpected error occurred. Please try again or contact support.".into(),
        ),
    );
    None
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::events::{ChannelSink, Delivery};
    use crate::lexicon::NoSynonyms;
    use crate::registry::SessionRegistry;
    use crate::translator::{Glossary, GlossaryTranslator};
    use crate::vocabulary::{RandomSelector, Selection, Vocabulary, WordSelector};
    use assert_matches::assert_matches;
    use std::collections::{HashMap, HashSet};
    use std::sync::mpsc::Receiver;
    use std::sync::Arc;
    use std::time::Duration;

    struct PanickingSelector;

    impl WordSelector for PanickingSelector {
        fn select_next(&self, _: &Vocabulary, _: &HashSet<String>, _: Option<&str>) -> Selection {
            panic!("selector exploded")
        }
    }

    fn create_hub(selector: Arc<dyn WordSelector>) -> (GameHub, Receiver<Delivery>) {
        crate::logging::init_for_tests();
        let (tx, rx) = mpsc::channel();
        let services = GameServices {
            vocabulary: Arc::new(Vocabulary::from_words("test", ["dog"])),
            selector,
            translator: Arc::new(GlossaryTranslator::from_glossaries([Glossary {
                code: "fr".into(),
                name: "French".into(),
                entries: HashMap::from([("dog".to_string(), "chien".to_string())]),
            }])),
            lexicon: Arc::new(NoSynonyms),
            sink: Arc::new(ChannelSink::new(tx)),
            registry: Arc::new(SessionRegistry::new()),
            answer_timeout: Duration::from_millis(20),
        };
        (GameHub::new(services), rx)
    }

    #[test]
    fn test_second_start_rejected_while_playing() {
        let (hub, _rx) = create_hub(Arc::new(RandomSelector));
        let handle = hub.start_game(1, 1, "fr").unwrap();

        assert_matches!(
            hub.start_game(1, 1, "fr"),
            Err(GameError::Registry(RegistryError::AlreadyActive(1)))
        );

        hub.exit_game(1).unwrap();
        handle.join();
    }

    #[test]
    fn test_greeting_precedes_first_prompt() {
        let (hub, rx) = create_hub(Arc::new(RandomSelector));

        let handle = hub.start_game(5, 5, "fr").unwrap();
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_matches!(first.event, OutboundEvent::Notice(n) if n.starts_with("🎮 Starting"));

        hub.exit_game(5).unwrap();
        handle.join();
    }

    #[test]
    fn test_closed_sink_rejects_start() {
        let (hub, rx) = create_hub(Arc::new(RandomSelector));
        drop(rx);

        assert_matches!(
            hub.start_game(6, 6, "fr"),
            Err(GameError::Sink(SinkError::Closed))
        );
        assert!(!hub.is_active(6));
    }

    #[test]
    fn test_exit_unknown_user() {
        let (hub, _rx) = create_hub(Arc::new(RandomSelector));
        assert_eq!(hub.exit_game(3), Err(RegistryError::NotActive(3)));
    }

    #[test]
    fn test_panicking_worker_is_contained() {
        let (hub, rx) = create_hub(Arc::new(PanickingSelector));

        let handle = hub.start_game(1, 1, "fr").unwrap();
        assert_eq!(handle.join(), None);
        assert!(!hub.is_active(1));

        let notices: Vec<_> = rx.try_iter().map(|d| d.event.text()).collect();
        assert!(notices.iter().any(|n| n.contains("unexpected error")));

        // the registration was released, so the user can start over
        let again = hub.start_game(1, 1, "fr").unwrap();
        assert_eq!(again.join(), None);
    }

    #[test]
    fn test_worker_deregisters_after_double_timeout() {
        let (hub, _rx) = create_hub(Arc::new(RandomSelector));

        let handle = hub.start_game(2, 9, "fr").unwrap();
        let end = handle.join();

        assert_matches!(end, Some(SessionEnd::Graceful(_)));
        assert!(!hub.is_active(2));
    }

    #[test]
    fn test_handle_dispatches_events() {
        let (hub, rx) = create_hub(Arc::new(RandomSelector));

        hub.handle(InboundEvent::StartGame {
            user: 4,
            channel: 4,
            language: "fr".into(),
        })
        .unwrap();
        assert!(hub.is_active(4));

        hub.handle(InboundEvent::Text(InboundText::new(4, 4, "dog")))
            .unwrap();
        hub.handle(InboundEvent::ExitGame { user: 4 }).unwrap();
        assert!(!hub.is_active(4));

        // the detached worker still reports its summary
        let summary = std::iter::from_fn(|| rx.recv_timeout(Duration::from_secs(5)).ok())
            .find(|d| matches!(d.event, OutboundEvent::Summary(_)));
        assert!(summary.is_some());
    }
}
