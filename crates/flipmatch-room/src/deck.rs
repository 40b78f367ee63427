//! Card deck generation: paired symbolic values, shuffled uniformly.

use flipmatch_protocol::CardValue;
use rand::Rng;
use rand::seq::SliceRandom;

/// Produces the shuffled deck for a new room.
///
/// A trait so tests can inject a fixed layout and drive match/mismatch
/// outcomes deterministically.
pub trait DeckSource: Send + Sync + 'static {
    /// Deals `2 × pair_count` cards: each symbol exactly twice, in a
    /// uniformly random order.
    fn deal(&self, pair_count: usize) -> Vec<CardValue>;
}

/// The default source: a uniform shuffle from `rand::rng()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffledDecks;

impl DeckSource for ShuffledDecks {
    fn deal(&self, pair_count: usize) -> Vec<CardValue> {
        deal_with(pair_count, &mut rand::rng())
    }
}

/// Deals a deck using the given RNG. Split out so tests can pass a seeded
/// `StdRng` and get a reproducible order.
pub fn deal_with<R: Rng + ?Sized>(pair_count: usize, rng: &mut R) -> Vec<CardValue> {
    let mut cards: Vec<CardValue> = (0..pair_count)
        .flat_map(|i| {
            let value = symbol(i);
            [value.clone(), value]
        })
        .collect();
    cards.shuffle(rng);
    cards
}

/// The symbol for pair `i`: `A`–`Z`, then `AA`, `AB`, … beyond 26 pairs
/// (spreadsheet-column style, so symbols never collide).
pub fn symbol(mut i: usize) -> CardValue {
    let mut out = String::new();
    loop {
        out.insert(0, (b'A' + (i % 26) as u8) as char);
        i /= 26;
        if i == 0 {
            break;
        }
        i -= 1;
    }
    CardValue(out)
}
