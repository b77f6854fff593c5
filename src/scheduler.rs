//! Delays requested by the game cores
//!
//! The cores never schedule callbacks themselves. They emit a
//! [`PendingDelay`] and carry on; the driver decides when (and whether) the
//! follow-up happens. Nothing in a session depends on a delay firing, so a
//! session can be dropped with delays still pending.

use serde::{Deserialize, Serialize};

/// What the presentation layer should do once a delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayReason {
    /// Turn a mismatched pair face down again
    UnflipCards { first: usize, second: usize },
    /// Hide the "Level N" overlay
    DismissLevelOverlay { level: u32 },
}

/// A delay the driver should schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDelay {
    pub after_ms: u64,
    pub reason: DelayReason,
}

/// Mismatched cards stay visible this long
pub const UNFLIP_DELAY_MS: u64 = 1_000;
/// Level overlays stay up this long
pub const LEVEL_OVERLAY_MS: u64 = 2_000;

/// Single-threaded scheduler on a virtual millisecond clock.
///
/// The driver advances the clock from its own loop and handles whatever
/// comes due on the same thread as the cores.
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    now_ms: u64,
    /// (due time, insertion order, reason)
    pending: Vec<(u64, u64, DelayReason)>,
    next_seq: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, delay: PendingDelay) {
        let due = self.now_ms.saturating_add(delay.after_ms);
        self.pending.push((due, self.next_seq, delay.reason));
        self.next_seq += 1;
    }

    /// Advance the clock and return everything now due, oldest deadline first
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<DelayReason> {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);

        let now = self.now_ms;
        let mut due: Vec<(u64, u64, DelayReason)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.0 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, seq, _)| (*at, *seq));

        if !due.is_empty() {
            log::trace!("{} delayed actions due at {} ms", due.len(), now);
        }
        due.into_iter().map(|(_, _, reason)| reason).collect()
    }

    /// Forget everything, e.g. when the session is torn down
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending delays", self.pending.len());
        }
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(level: u32, after_ms: u64) -> PendingDelay {
        PendingDelay {
            after_ms,
            reason: DelayReason::DismissLevelOverlay { level },
        }
    }

    #[test]
    fn test_fires_when_due() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(overlay(2, 2_000));

        assert!(scheduler.advance(1_999).is_empty());
        assert_eq!(
            scheduler.advance(1),
            vec![DelayReason::DismissLevelOverlay { level: 2 }]
        );
        // Fires once
        assert!(scheduler.advance(10_000).is_empty());
        assert_eq!(scheduler.now_ms(), 12_000);
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(overlay(3, 500));
        scheduler.schedule(PendingDelay {
            after_ms: 100,
            reason: DelayReason::UnflipCards { first: 0, second: 1 },
        });
        scheduler.schedule(overlay(4, 500));

        assert_eq!(
            scheduler.advance(1_000),
            vec![
                DelayReason::UnflipCards { first: 0, second: 1 },
                DelayReason::DismissLevelOverlay { level: 3 },
                DelayReason::DismissLevelOverlay { level: 4 },
            ]
        );
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(overlay(2, 10));
        scheduler.cancel_all();
        assert_eq!(scheduler.pending_len(), 0);
        assert!(scheduler.advance(100).is_empty());
    }
}
