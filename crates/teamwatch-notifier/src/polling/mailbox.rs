//! Single-slot roster hand-off between the refresher and the poller.
//!
//! Backed by a `watch` channel. Publishing overwrites whatever is pending
//! and never waits for the consumer; taking is a non-blocking check that
//! yields only the most recent roster.

use teamwatch_core::Roster;
use tokio::sync::watch;

/// Create a connected publisher/mailbox pair with nothing pending.
pub fn roster_mailbox() -> (RosterPublisher, RosterMailbox) {
    let (tx, rx) = watch::channel::<Option<Roster>>(None);
    (RosterPublisher { tx }, RosterMailbox { rx })
}

/// Sending half, owned by the roster refresher
#[derive(Clone)]
pub struct RosterPublisher {
    tx: watch::Sender<Option<Roster>>,
}

impl RosterPublisher {
    /// Replace the pending roster. Never blocks.
    pub fn publish(&self, roster: Roster) {
        // send_replace succeeds even when the mailbox has been dropped
        self.tx.send_replace(Some(roster));
    }
}

/// Receiving half, owned by the status poller
pub struct RosterMailbox {
    rx: watch::Receiver<Option<Roster>>,
}

impl RosterMailbox {
    /// Take the pending roster if one was published since the last take.
    pub fn try_take(&mut self) -> Option<Roster> {
        // Still delivers a roster published just before the publisher dropped
        let pending = self.rx.borrow_and_update();
        if pending.has_changed() {
            pending.clone()
        } else {
            None
        }
    }
}
