//! Room code generation.

use flipmatch_protocol::RoomCode;
use rand::Rng;

/// The characters room codes are drawn from: uppercase alphanumerics,
/// chosen so codes are easy to read aloud and type.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Produces short room identifiers.
///
/// A trait so the registry can be handed a deterministic source in tests
/// (and so collision behavior — see
/// [`RoomRegistry::create_room`](crate::RoomRegistry::create_room) — can
/// be exercised on purpose).
pub trait CodeSource: Send + Sync + 'static {
    /// Generates one candidate code of the given length. Uniqueness is the
    /// registry's job, not the generator's.
    fn generate(&self, length: usize) -> RoomCode;
}

/// The default source: uniform draws from a cryptographically secure RNG.
///
/// `rand::rng()` is a CSPRNG, so codes are not guessable from earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn generate(&self, length: usize) -> RoomCode {
        let mut rng = rand::rng();
        let code: String = (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        RoomCode::new(code)
    }
}
