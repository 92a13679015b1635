//! Cancellable delayed tasks with at most one live instance per channel.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Handle-holding slot for one debounce channel.
///
/// Scheduling aborts the previous timer before arming a new one. Every
/// schedule bumps the sequence number, so an event from a timer that fired
/// just before being replaced is recognizable as stale on arrival.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    seq: u64,
    /// Last sequence handed out by `accept`
    accepted: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            seq: 0,
            accepted: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer. After `delay` of quiet the event built by `make_event`
    /// is sent on `tx`. Returns the sequence number carried by that event.
    pub fn schedule<E, F>(&mut self, tx: &UnboundedSender<E>, make_event: F) -> u64
    where
        E: Send + 'static,
        F: FnOnce(u64) -> E + Send + 'static,
    {
        self.cancel();
        self.seq += 1;
        let seq = self.seq;
        let delay = self.delay;
        let tx = tx.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the coordinator shut down.
            let _ = tx.send(make_event(seq));
        }));
        seq
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Cancel and invalidate any event already queued from an earlier timer.
    pub fn invalidate(&mut self) {
        self.cancel();
        self.seq += 1;
    }

    /// Accept a fired event. Returns false if a newer schedule superseded it
    /// or the same event was already accepted.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq != self.seq || seq == self.accepted {
            return false;
        }
        self.accepted = seq;
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn current_seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
