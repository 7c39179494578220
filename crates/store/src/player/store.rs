//! Player store: validated mutations over [`PlayerProfile`].

use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use tracing::debug;

use super::profile::{MAX_LEVEL, MAX_USERNAME_CHARS, MIN_LEVEL, PlayerProfile};
use crate::error::{Result, ValidationError, non_negative};
use crate::observer::{Subscribers, Subscription};
use crate::Store;

/// Replacement values for statistics. Unset fields are left alone.
///
/// `high_score` only replaces the current value when it is strictly greater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsUpdate {
    pub total_score: Option<i64>,
    pub high_score: Option<i64>,
    pub games_played: Option<i64>,
    pub total_bubbles_popped: Option<i64>,
}

impl StatisticsUpdate {
    pub fn with_total_score(mut self, value: i64) -> Self {
        self.total_score = Some(value);
        self
    }

    pub fn with_high_score(mut self, value: i64) -> Self {
        self.high_score = Some(value);
        self
    }

    pub fn with_games_played(mut self, value: i64) -> Self {
        self.games_played = Some(value);
        self
    }

    pub fn with_total_bubbles_popped(mut self, value: i64) -> Self {
        self.total_bubbles_popped = Some(value);
        self
    }
}

/// Increments added to the cumulative statistics. Unset fields add nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsIncrement {
    pub total_score: Option<i64>,
    pub games_played: Option<i64>,
    pub total_bubbles_popped: Option<i64>,
}

impl StatisticsIncrement {
    pub fn with_total_score(mut self, value: i64) -> Self {
        self.total_score = Some(value);
        self
    }

    pub fn with_games_played(mut self, value: i64) -> Self {
        self.games_played = Some(value);
        self
    }

    pub fn with_total_bubbles_popped(mut self, value: i64) -> Self {
        self.total_bubbles_popped = Some(value);
        self
    }
}

/// Authoritative in-memory player profile.
///
/// Every mutation is applied to a copy and swapped in only when it
/// validates, so a rejected call leaves the profile exactly as it was.
#[derive(Debug)]
pub struct PlayerStore {
    state: RwLock<PlayerProfile>,
    subscribers: Subscribers<PlayerProfile>,
}

impl PlayerStore {
    /// Store holding a fresh default profile.
    pub fn new() -> Self {
        Self::with_profile(PlayerProfile::new())
    }

    pub fn with_profile(profile: PlayerProfile) -> Self {
        Self {
            state: RwLock::new(profile),
            subscribers: Subscribers::new(),
        }
    }

    /// Set the username to `name` with surrounding whitespace removed.
    pub fn update_username(&self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if length > MAX_USERNAME_CHARS {
            return Err(ValidationError::UsernameTooLong {
                length,
                max: MAX_USERNAME_CHARS,
            });
        }

        self.commit(|profile| {
            profile.username = trimmed.to_string();
            Ok(())
        })
    }

    /// Set level and experience, recomputing the experience threshold.
    pub fn update_level(&self, level: i64, experience: i64) -> Result<()> {
        let level = u32::try_from(level)
            .ok()
            .filter(|l| (MIN_LEVEL..=MAX_LEVEL).contains(l))
            .ok_or(ValidationError::LevelOutOfRange {
                level,
                min: MIN_LEVEL,
                max: MAX_LEVEL,
            })?;
        let experience = non_negative("experience", experience)?;

        self.commit(|profile| {
            profile.level = level;
            profile.experience = experience;
            profile.experience_to_next_level = PlayerProfile::experience_to_next_level_for(level);
            Ok(())
        })
    }

    pub fn update_ap(&self, value: i64) -> Result<()> {
        let ap = non_negative("ap", value)?;
        self.commit(|profile| {
            profile.ap = ap;
            Ok(())
        })
    }

    pub fn update_tap(&self, value: i64) -> Result<()> {
        let tap = non_negative("tap", value)?;
        self.commit(|profile| {
            profile.tap = tap;
            Ok(())
        })
    }

    /// Replace the provided statistics and touch `last_played_at`.
    pub fn update_statistics(&self, update: StatisticsUpdate) -> Result<()> {
        let total_score = update
            .total_score
            .map(|v| non_negative("totalScore", v))
            .transpose()?;
        let games_played = update
            .games_played
            .map(|v| non_negative("gamesPlayed", v))
            .transpose()?;
        let total_bubbles_popped = update
            .total_bubbles_popped
            .map(|v| non_negative("totalBubblesPopped", v))
            .transpose()?;

        self.commit(|profile| {
            if let Some(value) = total_score {
                profile.total_score = value;
            }
            // A negative high score never beats the stored one.
            if let Some(value) = update.high_score.and_then(|v| u64::try_from(v).ok())
                && value > profile.high_score
            {
                profile.high_score = value;
            }
            if let Some(value) = games_played {
                profile.games_played = value;
            }
            if let Some(value) = total_bubbles_popped {
                profile.total_bubbles_popped = value;
            }
            profile.last_played_at = Utc::now();
            Ok(())
        })
    }

    /// Add the provided increments to the cumulative statistics and touch
    /// `last_played_at`.
    pub fn add_to_statistics(&self, increment: StatisticsIncrement) -> Result<()> {
        let total_score = non_negative("totalScore", increment.total_score.unwrap_or(0))?;
        let games_played = non_negative("gamesPlayed", increment.games_played.unwrap_or(0))?;
        let total_bubbles_popped = non_negative(
            "totalBubblesPopped",
            increment.total_bubbles_popped.unwrap_or(0),
        )?;

        self.commit(|profile| {
            profile.total_score = profile.total_score.saturating_add(total_score);
            profile.games_played = profile.games_played.saturating_add(games_played);
            profile.total_bubbles_popped = profile
                .total_bubbles_popped
                .saturating_add(total_bubbles_popped);
            profile.last_played_at = Utc::now();
            Ok(())
        })
    }

    /// Replace the whole profile without validation. Used when restoring
    /// saved or imported data.
    pub fn load_player_data(&self, profile: PlayerProfile) {
        debug!(user_id = %profile.user_id, "loading player profile");
        self.replace(profile);
    }

    /// Replace the profile with a fresh default, including a new user id.
    pub fn reset_player_data(&self) {
        let profile = PlayerProfile::new();
        debug!(user_id = %profile.user_id, "resetting player profile");
        self.replace(profile);
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> PlayerProfile {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, profile: PlayerProfile) {
        // Infallible: the closure never rejects.
        let _ = self.commit(move |current| {
            *current = profile;
            Ok(())
        });
    }

    fn commit<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut PlayerProfile) -> Result<()>,
    {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = state.clone();
            mutate(&mut next)?;
            *state = next.clone();
            next
        };
        self.subscribers.notify(&snapshot);
        Ok(())
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for PlayerStore {
    type State = PlayerProfile;

    const NAME: &'static str = "PlayerStore";

    fn snapshot(&self) -> PlayerProfile {
        PlayerStore::snapshot(self)
    }

    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PlayerProfile) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }
}
