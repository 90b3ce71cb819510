use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use tracing::debug;

use crate::error::RegistryError;
use crate::events::{InboundText, UserId};

/// Identifies one registration of a user.
///
/// A user who exits and immediately starts again gets a new ticket, so a
/// worker still winding down the old game can tell it no longer owns the
/// registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionTicket(u64);

struct Registration {
    ticket: SessionTicket,
    mailbox: Sender<InboundText>,
}

/// Which users are playing right now, and where to deliver their answers
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<UserId, Registration>,
    next_ticket: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `user`, failing if they already have a game.
    ///
    /// Check and insert happen under the same shard lock, so two racing
    /// starts for one user cannot both succeed.
    pub fn start(
        &self,
        user: UserId,
        mailbox: Sender<InboundText>,
    ) -> Result<SessionTicket, RegistryError> {
        match self.sessions.entry(user) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyActive(user)),
            Entry::Vacant(slot) => {
                let ticket = SessionTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
                slot.insert(Registration { ticket, mailbox });
                debug!(user, "session registered");
                Ok(ticket)
            }
        }
    }

    pub fn is_active(&self, user: UserId) -> bool {
        self.sessions.contains_key(&user)
    }

    /// Whether `user` is still registered under this exact ticket
    pub fn holds(&self, user: UserId, ticket: SessionTicket) -> bool {
        self.sessions
            .get(&user)
            .is_some_and(|reg| reg.ticket == ticket)
    }

    /// Remove `user`. Dropping the mailbox wakes a worker blocked on answers.
    pub fn stop(&self, user: UserId) -> Result<(), RegistryError> {
        match self.sessions.remove(&user) {
            Some(_) => {
                debug!(user, "session stopped");
                Ok(())
            }
            None => Err(RegistryError::NotActive(user)),
        }
    }

    /// Worker-side deregistration; a newer registration of the same user is left alone
    pub fn release(&self, user: UserId, ticket: SessionTicket) -> bool {
        self.sessions
            .remove_if(&user, |_, reg| reg.ticket == ticket)
            .is_some()
    }

    /// Hand a message to the author's session, if they have one
    pub fn deliver(&self, text: InboundText) -> bool {
        match self.sessions.get(&text.author) {
            Some(reg) => reg.mailbox.send(text).is_ok(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn mailbox() -> Sender<InboundText> {
        mpsc::channel().0
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let registry = SessionRegistry::new();

        assert!(registry.start(1, mailbox()).is_ok());
        assert_matches!(
            registry.start(1, mailbox()),
            Err(RegistryError::AlreadyActive(1))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_stop_unknown_user() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.stop(9), Err(RegistryError::NotActive(9)));
    }

    #[test]
    fn test_stop_then_start_again() {
        let registry = SessionRegistry::new();

        let first = registry.start(1, mailbox()).unwrap();
        registry.stop(1).unwrap();
        assert!(!registry.is_active(1));

        let second = registry.start(1, mailbox()).unwrap();
        assert_ne!(first, second);
        assert!(registry.is_active(1));
    }

    #[test]
    fn test_stale_release_keeps_new_registration() {
        let registry = SessionRegistry::new();

        let old = registry.start(1, mailbox()).unwrap();
        registry.stop(1).unwrap();
        let new = registry.start(1, mailbox()).unwrap();

        assert!(!registry.release(1, old));
        assert!(registry.holds(1, new));
        assert!(!registry.holds(1, old));
        assert!(registry.release(1, new));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_deliver_routes_to_author() {
        let registry = SessionRegistry::new();
        let (tx, rx) = mpsc::channel();
        registry.start(5, tx).unwrap();

        assert!(registry.deliver(InboundText::new(5, 1, "chien")));
        assert!(!registry.deliver(InboundText::new(6, 1, "chat")));
        assert_eq!(rx.try_recv().unwrap().text, "chien");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_disconnects_mailbox() {
        let registry = SessionRegistry::new();
        let (tx, rx) = mpsc::channel::<InboundText>();
        registry.start(5, tx).unwrap();

        registry.stop(5).unwrap();
        assert_eq!(rx.recv(), Err(mpsc::RecvError));
    }

    #[test]
    fn test_concurrent_starts_admit_one() {
        let registry = Arc::new(SessionRegistry::new());
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.start(42, mailbox()).is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(registry.len(), 1);
    }
}
