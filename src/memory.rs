//! Memory match core
//!
//! A shuffled deck of card pairs. Two flips make an attempt: equal pair ids
//! stay face up, anything else is turned back after a delay the driver owns.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::IgnoreReason;
use crate::consts::{MEMORY_LEVEL_UP_BONUS, PAIR_SCORE};
use crate::scheduler::{DelayReason, LEVEL_OVERLAY_MS, PendingDelay, UNFLIP_DELAY_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub pair_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Pairs added per level
    pub pairs_per_level: u32,
    /// Deck size cap, in pairs
    pub max_pairs: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            pairs_per_level: 2,
            max_pairs: 16,
        }
    }
}

impl MemoryConfig {
    /// Pairs dealt at `level`
    pub fn pairs_for_level(&self, level: u32) -> u32 {
        level.saturating_mul(self.pairs_per_level).clamp(1, self.max_pairs.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryEvent {
    Flipped { index: usize },
    Ignored { index: usize, reason: IgnoreReason },
    PairMatched { first: usize, second: usize },
    Mismatch { first: usize, second: usize },
    LevelUp { level: u32, pairs: u32 },
    DelayRequested(PendingDelay),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySession {
    pub config: MemoryConfig,
    pub cards: Vec<Card>,
    /// Face-up cards of the attempt in progress (at most one between calls)
    pub flipped: Vec<usize>,
    pub matched: BTreeSet<usize>,
    /// Last mismatched pair, still shown until the unflip delay fires
    pub showing_mismatch: Option<(usize, usize)>,
    pub score: u64,
    pub level: u32,
}

impl MemorySession {
    pub fn new<R: Rng + ?Sized>(config: MemoryConfig, rng: &mut R) -> Self {
        let cards = deal(config.pairs_for_level(1), rng);
        Self::with_cards(config, cards)
    }

    /// Session over a fixed deck, level 1
    pub fn with_cards(config: MemoryConfig, cards: Vec<Card>) -> Self {
        Self {
            config,
            cards,
            flipped: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            showing_mismatch: None,
            score: 0,
            level: 1,
        }
    }

    /// Whether the face of card `index` is visible
    pub fn revealed(&self, index: usize) -> bool {
        self.flipped.contains(&index)
            || self.matched.contains(&index)
            || self
                .showing_mismatch
                .is_some_and(|(a, b)| a == index || b == index)
    }

    pub fn pairs(&self) -> usize {
        self.cards.len() / 2
    }

    /// Discrete input channel: turn card `index` face up
    pub fn flip<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Vec<MemoryEvent> {
        let reason = if index >= self.cards.len() {
            Some(IgnoreReason::OutOfRange)
        } else if self.matched.contains(&index) {
            Some(IgnoreReason::AlreadyMatched)
        } else if self.flipped.contains(&index) {
            Some(IgnoreReason::AlreadyFlipped)
        } else {
            None
        };
        if let Some(reason) = reason {
            return vec![MemoryEvent::Ignored { index, reason }];
        }

        // A new attempt hides the previous mismatch even if its delay never fired
        self.showing_mismatch = None;
        self.flipped.push(index);
        let mut events = vec![MemoryEvent::Flipped { index }];

        if self.flipped.len() == 2 {
            let (first, second) = (self.flipped[0], self.flipped[1]);
            self.flipped.clear();
            if self.cards[first].pair_id == self.cards[second].pair_id {
                self.matched.insert(first);
                self.matched.insert(second);
                self.score += PAIR_SCORE;
                events.push(MemoryEvent::PairMatched { first, second });

                if self.matched.len() == self.cards.len() {
                    self.level_up(rng, &mut events);
                }
            } else {
                self.showing_mismatch = Some((first, second));
                events.push(MemoryEvent::Mismatch { first, second });
                events.push(MemoryEvent::DelayRequested(PendingDelay {
                    after_ms: UNFLIP_DELAY_MS,
                    reason: DelayReason::UnflipCards { first, second },
                }));
            }
        }

        events
    }

    /// Delay callback: hide a mismatched pair. Stale pairs are ignored.
    pub fn unflip(&mut self, first: usize, second: usize) -> bool {
        if self.showing_mismatch == Some((first, second)) {
            self.showing_mismatch = None;
            true
        } else {
            false
        }
    }

    fn level_up<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<MemoryEvent>) {
        self.level += 1;
        self.score += MEMORY_LEVEL_UP_BONUS;
        let pairs = self.config.pairs_for_level(self.level);
        self.cards = deal(pairs, rng);
        self.matched.clear();
        self.flipped.clear();
        self.showing_mismatch = None;

        events.push(MemoryEvent::LevelUp {
            level: self.level,
            pairs,
        });
        events.push(MemoryEvent::DelayRequested(PendingDelay {
            after_ms: LEVEL_OVERLAY_MS,
            reason: DelayReason::DismissLevelOverlay { level: self.level },
        }));
        log::info!("Memory level {}: {} pairs (score {})", self.level, pairs, self.score);
    }
}

/// Shuffled deck with two cards per pair id, ids starting at 1
pub fn deal<R: Rng + ?Sized>(pairs: u32, rng: &mut R) -> Vec<Card> {
    let mut cards: Vec<Card> = (1..=pairs)
        .flat_map(|pair_id| [Card { pair_id }, Card { pair_id }])
        .collect();
    cards.shuffle(rng);
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeded_rng;
    use proptest::prelude::*;

    fn deck(ids: &[u32]) -> Vec<Card> {
        ids.iter().map(|&pair_id| Card { pair_id }).collect()
    }

    #[test]
    fn test_deck_sizes() {
        let config = MemoryConfig::default();
        assert_eq!(config.pairs_for_level(1), 2);
        assert_eq!(config.pairs_for_level(3), 6);
        assert_eq!(config.pairs_for_level(8), 16);
        assert_eq!(config.pairs_for_level(50), 16);

        let mut rng = seeded_rng(5);
        let session = MemorySession::new(config, &mut rng);
        assert_eq!(session.cards.len(), 4);
        let mut ids: Vec<u32> = session.cards.iter().map(|c| c.pair_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_match_then_level_up() {
        let mut session = MemorySession::with_cards(MemoryConfig::default(), deck(&[1, 1, 2, 2]));
        let mut rng = seeded_rng(9);

        assert_eq!(session.flip(0, &mut rng), vec![MemoryEvent::Flipped { index: 0 }]);
        let events = session.flip(1, &mut rng);
        assert_eq!(
            events,
            vec![
                MemoryEvent::Flipped { index: 1 },
                MemoryEvent::PairMatched { first: 0, second: 1 }
            ]
        );
        assert_eq!(session.score, 10);
        assert!(session.revealed(0) && session.revealed(1));

        session.flip(2, &mut rng);
        let events = session.flip(3, &mut rng);
        assert!(events.contains(&MemoryEvent::LevelUp { level: 2, pairs: 4 }));
        assert_eq!(session.level, 2);
        assert_eq!(session.score, 10 + 10 + 50);
        assert_eq!(session.cards.len(), 8);
        assert!(session.matched.is_empty());
        assert!(session.flipped.is_empty());
    }

    #[test]
    fn test_mismatch_requests_unflip() {
        let mut session = MemorySession::with_cards(MemoryConfig::default(), deck(&[1, 2, 1, 2]));
        let mut rng = seeded_rng(9);

        session.flip(0, &mut rng);
        let events = session.flip(1, &mut rng);
        assert_eq!(
            events,
            vec![
                MemoryEvent::Flipped { index: 1 },
                MemoryEvent::Mismatch { first: 0, second: 1 },
                MemoryEvent::DelayRequested(PendingDelay {
                    after_ms: UNFLIP_DELAY_MS,
                    reason: DelayReason::UnflipCards { first: 0, second: 1 },
                }),
            ]
        );
        assert!(session.flipped.is_empty());
        assert_eq!(session.score, 0);
        assert!(session.revealed(0));

        assert!(session.unflip(0, 1));
        assert!(!session.revealed(0));
        assert!(!session.unflip(0, 1));
    }

    #[test]
    fn test_next_flip_hides_mismatch_without_timer() {
        let mut session = MemorySession::with_cards(MemoryConfig::default(), deck(&[1, 2, 1, 2]));
        let mut rng = seeded_rng(9);

        session.flip(0, &mut rng);
        session.flip(1, &mut rng);
        session.flip(2, &mut rng);
        assert!(!session.revealed(1));
        assert!(session.revealed(2));
        // Late callback for the old pair is harmless
        assert!(!session.unflip(0, 1));
        assert_eq!(session.flipped, vec![2]);
    }

    #[test]
    fn test_ignored_flips() {
        let mut session = MemorySession::with_cards(MemoryConfig::default(), deck(&[1, 1, 2, 2]));
        let mut rng = seeded_rng(9);

        assert_eq!(
            session.flip(4, &mut rng),
            vec![MemoryEvent::Ignored { index: 4, reason: IgnoreReason::OutOfRange }]
        );

        session.flip(2, &mut rng);
        assert_eq!(
            session.flip(2, &mut rng),
            vec![MemoryEvent::Ignored { index: 2, reason: IgnoreReason::AlreadyFlipped }]
        );
        session.flip(3, &mut rng);
        assert_eq!(
            session.flip(3, &mut rng),
            vec![MemoryEvent::Ignored { index: 3, reason: IgnoreReason::AlreadyMatched }]
        );
        assert_eq!(session.score, 10);
    }

    proptest! {
        #[test]
        fn prop_flipped_and_matched_stay_disjoint(
            seed in any::<u64>(),
            flips in prop::collection::vec(0usize..40, 1..200),
        ) {
            let mut rng = seeded_rng(seed);
            let mut session = MemorySession::new(MemoryConfig::default(), &mut rng);

            for index in flips {
                let score = session.score;
                session.flip(index % (session.cards.len() + 1), &mut rng);
                prop_assert!(session.flipped.len() <= 1);
                prop_assert!(session.flipped.iter().all(|i| !session.matched.contains(i)));
                prop_assert!(session.matched.len() % 2 == 0);
                prop_assert!(session.score >= score);
            }
        }
    }
}
