//! Game configuration.

use std::time::Duration;

/// Settings for new rooms.
///
/// One config is handed to the [`RoomRegistry`](crate::RoomRegistry) at
/// construction and applies to every room it creates.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Number of distinct card values. Total cards = 2 × `pair_count`.
    pub pair_count: usize,

    /// Length of generated room codes.
    pub code_length: usize,

    /// How long both cards of a mismatch stay face-up before the turn
    /// advances. A pacing affordance for human players, not a correctness
    /// requirement.
    pub mismatch_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pair_count: 8,
            code_length: 6,
            mismatch_delay: Duration::from_secs(1),
        }
    }
}

impl GameConfig {
    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called by [`RoomRegistry::new`](crate::RoomRegistry::new). Rules:
    /// - `pair_count` at least 1 (a zero-card game would be born finished).
    /// - `code_length` at least 4 (shorter codes collide too easily).
    pub fn validated(mut self) -> Self {
        if self.pair_count == 0 {
            tracing::warn!("pair_count of 0 is unplayable — raising to 1");
            self.pair_count = 1;
        }
        if self.code_length < 4 {
            tracing::warn!(
                len = self.code_length,
                "code_length below 4 — raising to 4"
            );
            self.code_length = 4;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.pair_count, 8);
        assert_eq!(config.code_length, 6);
        assert_eq!(config.mismatch_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_validated_raises_zero_pair_count() {
        let config = GameConfig {
            pair_count: 0,
            ..GameConfig::default()
        }
        .validated();
        assert_eq!(config.pair_count, 1);
    }

    #[test]
    fn test_validated_raises_tiny_code_length() {
        let config = GameConfig {
            code_length: 1,
            ..GameConfig::default()
        }
        .validated();
        assert_eq!(config.code_length, 4);
    }

    #[test]
    fn test_validated_keeps_sane_values() {
        let config = GameConfig {
            pair_count: 12,
            code_length: 8,
            mismatch_delay: Duration::from_millis(500),
        }
        .validated();
        assert_eq!(config.pair_count, 12);
        assert_eq!(config.code_length, 8);
    }
}
