//! Player profile aggregate and its derived values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest reachable level.
pub const MIN_LEVEL: u32 = 1;

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 100;

/// Maximum username length, counted in characters after trimming.
pub const MAX_USERNAME_CHARS: usize = 20;

/// Persisted player profile and progression.
///
/// Counters are unsigned; the store's mutation API takes signed input and
/// rejects negatives before anything reaches this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// Opaque id generated at creation. Only a reset replaces it.
    pub user_id: String,
    pub username: String,
    pub level: u32,
    pub experience: u64,
    /// Derived from `level`, see [`PlayerProfile::experience_to_next_level_for`].
    pub experience_to_next_level: u64,
    pub ap: u64,
    pub tap: u64,
    pub total_score: u64,
    pub high_score: u64,
    pub games_played: u64,
    pub total_bubbles_popped: u64,
    pub created_at: DateTime<Utc>,
    pub last_played_at: DateTime<Utc>,
}

impl PlayerProfile {
    /// Fresh level-1 profile with a newly generated id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            user_id: generate_user_id(),
            username: String::new(),
            level: MIN_LEVEL,
            experience: 0,
            experience_to_next_level: Self::experience_to_next_level_for(MIN_LEVEL),
            ap: 0,
            tap: 0,
            total_score: 0,
            high_score: 0,
            games_played: 0,
            total_bubbles_popped: 0,
            created_at: now,
            last_played_at: now,
        }
    }

    /// Experience needed to leave `level`.
    ///
    /// Formula: `level × 100 + (level − 1) × 50`
    pub fn experience_to_next_level_for(level: u32) -> u64 {
        let level = u64::from(level);
        level * 100 + level.saturating_sub(1) * 50
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// 16 random bytes, hex encoded.
pub fn generate_user_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}
