//! Static rank table.
//!
//! # Invariants
//! - Rows are ordered by `level` and `min_points`, both strictly increasing.
//! - The first row has `min_points == 0`.

/// One named tier of the progression ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub level: u32,
    pub name: &'static str,
    pub min_points: u32,
}

pub const RANKS: &[Rank] = &[
    Rank {
        level: 1,
        name: "Novice",
        min_points: 0,
    },
    Rank {
        level: 2,
        name: "Apprentice",
        min_points: 200,
    },
    Rank {
        level: 3,
        name: "Practitioner",
        min_points: 400,
    },
    Rank {
        level: 4,
        name: "Expert",
        min_points: 600,
    },
    Rank {
        level: 5,
        name: "Master",
        min_points: 800,
    },
    Rank {
        level: 6,
        name: "Guru",
        min_points: 1000,
    },
];

/// Lowest rank, used as fallback for unknown levels.
pub fn lowest_rank() -> &'static Rank {
    &RANKS[0]
}

/// Looks up a rank by exact level.
pub fn rank_for_level(level: u32) -> Option<&'static Rank> {
    RANKS.iter().find(|rank| rank.level == level)
}

/// Display name for `level`, falling back to the lowest rank's name.
pub fn rank_name(level: u32) -> &'static str {
    rank_for_level(level).unwrap_or_else(lowest_rank).name
}

/// Highest rank whose threshold is reached by `points`.
pub fn rank_for_points(points: u32) -> &'static Rank {
    RANKS
        .iter()
        .rev()
        .find(|rank| rank.min_points <= points)
        .unwrap_or_else(lowest_rank)
}
