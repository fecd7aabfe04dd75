//! Achievement catalog and unlock state.
//!
//! # Invariants
//! - Unlock state is owned by the store; nothing in core evaluates rules.
//! - Unknown kinds coming from a store are preserved verbatim.

use super::icon::Icon;
use serde::{Deserialize, Serialize};

/// Achievement identifier as used on the wire (`type`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AchievementKind {
    FirstSteps,
    WeekDiscipline,
    EarlyBird,
    TimeMaster,
    Marathon,
    Legend,
    Other(String),
}

impl AchievementKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FirstSteps => "first_steps",
            Self::WeekDiscipline => "week_discipline",
            Self::EarlyBird => "early_bird",
            Self::TimeMaster => "time_master",
            Self::Marathon => "marathon",
            Self::Legend => "legend",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            Self::FirstSteps => Icon::Award,
            Self::WeekDiscipline => Icon::Trophy,
            Self::EarlyBird => Icon::Sunrise,
            Self::TimeMaster => Icon::Clock,
            Self::Marathon => Icon::Flame,
            Self::Legend => Icon::Crown,
            Self::Other(_) => Icon::Medal,
        }
    }
}

impl From<String> for AchievementKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "first_steps" => Self::FirstSteps,
            "week_discipline" => Self::WeekDiscipline,
            "early_bird" => Self::EarlyBird,
            "time_master" => Self::TimeMaster,
            "marathon" => Self::Marathon,
            "legend" => Self::Legend,
            _ => Self::Other(value),
        }
    }
}

impl From<AchievementKind> for String {
    fn from(value: AchievementKind) -> Self {
        value.as_str().to_string()
    }
}

/// One achievement with its unlock flag, as reported by a profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unlocked: bool,
}

impl Achievement {
    pub fn icon(&self) -> Icon {
        self.kind.icon()
    }
}

/// Static catalog row used to seed a new user's achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl CatalogEntry {
    /// Locked achievement instance for this catalog row.
    pub fn to_achievement(self) -> Achievement {
        Achievement {
            kind: AchievementKind::from(self.kind.to_string()),
            title: self.title.to_string(),
            description: self.description.to_string(),
            unlocked: false,
        }
    }
}

pub const ACHIEVEMENT_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        kind: "first_steps",
        title: "First Steps",
        description: "Complete your first task",
    },
    CatalogEntry {
        kind: "week_discipline",
        title: "Week of Discipline",
        description: "Complete all tasks 7 days in a row",
    },
    CatalogEntry {
        kind: "early_bird",
        title: "Early Bird",
        description: "Complete a morning task before 8:00",
    },
    CatalogEntry {
        kind: "time_master",
        title: "Time Master",
        description: "Complete every task in one day",
    },
    CatalogEntry {
        kind: "marathon",
        title: "Marathon",
        description: "Complete tasks 30 days in a row",
    },
    CatalogEntry {
        kind: "legend",
        title: "Legend",
        description: "Reach 1000 points",
    },
];
