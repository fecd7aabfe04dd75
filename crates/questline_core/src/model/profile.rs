//! User profile snapshot.
//!
//! # Invariants
//! - `points` is never negative (unsigned).
//! - Level is never stored here; it is derived from `points`
//!   (see [`crate::service::progression`]).

use super::achievement::Achievement;
use crate::service::progression::{level_for_points, level_progress, LevelProgress};
use serde::{Deserialize, Serialize};

/// Profile state as reported by a profile store.
///
/// A store-reported `currentLevel` is accepted on the wire and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub last_active_date: Option<String>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl UserProfile {
    pub fn level(&self) -> u32 {
        level_for_points(self.points)
    }

    pub fn progress(&self) -> LevelProgress {
        level_progress(self.points)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements
            .iter()
            .filter(|achievement| achievement.unlocked)
            .count()
    }
}
