//! Card symbols and deck construction

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

/// Icon names understood by the web front end, in the order difficulties take them
pub const SYMBOLS: [&str; 16] = [
    "fa-ghost",
    "fa-dragon",
    "fa-gamepad",
    "fa-dice-d20",
    "fa-puzzle-piece",
    "fa-robot",
    "fa-rocket",
    "fa-meteor",
    "fa-heart",
    "fa-star",
    "fa-bolt",
    "fa-snowflake",
    "fa-moon",
    "fa-crown",
    "fa-fire",
    "fa-gem",
];

/// One slot in the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Card {
    pub symbol: &'static str,
    /// Face up
    pub revealed: bool,
    /// Paired and out of play
    pub matched: bool,
}

impl Card {
    fn face_down(symbol: &'static str) -> Self {
        Self {
            symbol,
            revealed: false,
            matched: false,
        }
    }
}

/// First `symbol_count` symbols, each twice, uniformly shuffled
pub fn build_deck<R: Rng>(symbol_count: usize, rng: &mut R) -> Vec<Card> {
    let mut deck: Vec<Card> = SYMBOLS
        .iter()
        .take(symbol_count)
        .flat_map(|&symbol| [Card::face_down(symbol), Card::face_down(symbol)])
        .collect();
    deck.shuffle(rng);
    deck
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn prop_every_symbol_twice(seed in any::<u64>(), count in 1usize..=16) {
            let mut rng = crate::session_rng(seed);
            let deck = build_deck(count, &mut rng);
            prop_assert_eq!(deck.len(), count * 2);

            let mut seen: HashMap<&str, usize> = HashMap::new();
            for card in &deck {
                *seen.entry(card.symbol).or_default() += 1;
                prop_assert!(!card.revealed && !card.matched);
            }
            prop_assert_eq!(seen.len(), count);
            prop_assert!(seen.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn test_shuffle_depends_on_seed() {
        let a = build_deck(8, &mut crate::session_rng(1));
        let b = build_deck(8, &mut crate::session_rng(2));
        let c = build_deck(8, &mut crate::session_rng(1));
        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
