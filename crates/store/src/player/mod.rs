//! Player profile and progression.

mod profile;
mod store;

pub use profile::{MAX_LEVEL, MAX_USERNAME_CHARS, MIN_LEVEL, PlayerProfile, generate_user_id};
pub use store::{PlayerStore, StatisticsIncrement, StatisticsUpdate};
