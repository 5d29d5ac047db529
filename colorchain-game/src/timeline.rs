//! Cancellable scheduled cues for the presentation phase.
//!
//! Every ticket carries the epoch it was issued in. Cancelling bumps the
//! epoch, so tickets still held by a host timer go stale and are ignored
//! when they come back.
use serde::{Deserialize, Serialize};

use crate::palette::Color;

/// Action a ticket performs when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    /// Pre-roll elapsed; start flashing the target sequence.
    BeginPresentation,
    FlashOn { index: usize, color: Color },
    FlashOff { index: usize, color: Color },
    /// Playback finished; accept player input.
    OpenInput,
}

/// Handle to one scheduled cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub epoch: u64,
    pub seq: u64,
    pub due_ms: u64,
    pub cue: Cue,
}

impl Ticket {
    const fn order_key(&self) -> (u64, u64) {
        (self.due_ms, self.seq)
    }
}

/// Ordered queue of pending tickets for the current epoch.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    epoch: u64,
    next_seq: u64,
    pending: Vec<Ticket>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Queue `cue` to fire at `due_ms` in the current epoch.
    pub fn schedule(&mut self, due_ms: u64, cue: Cue) -> Ticket {
        let ticket = Ticket {
            epoch: self.epoch,
            seq: self.next_seq,
            due_ms,
            cue,
        };
        self.next_seq = self.next_seq.saturating_add(1);
        let position = self
            .pending
            .partition_point(|queued| queued.order_key() <= ticket.order_key());
        self.pending.insert(position, ticket);
        ticket
    }

    /// Drop every pending ticket and invalidate outstanding handles.
    /// Returns the number of tickets discarded.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.epoch = self.epoch.saturating_add(1);
        dropped
    }

    /// True when `ticket` is still queued in the current epoch.
    #[must_use]
    pub fn is_live(&self, ticket: &Ticket) -> bool {
        ticket.epoch == self.epoch && self.pending.iter().any(|queued| queued.seq == ticket.seq)
    }

    /// Remove and return the earliest ticket due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Ticket> {
        match self.pending.first() {
            Some(first) if first.due_ms <= now_ms => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    /// Remove and return the earliest ticket ordered at or before `limit`.
    pub fn pop_through(&mut self, limit: &Ticket) -> Option<Ticket> {
        match self.pending.first() {
            Some(first) if first.order_key() <= limit.order_key() => {
                Some(self.pending.remove(0))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.first().map(|ticket| ticket.due_ms)
    }

    #[must_use]
    pub fn pending(&self) -> &[Ticket] {
        &self.pending
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
