//! Enumerated display icons.
//!
//! Renderers map each tag to whatever glyph set they use; the core only
//! guarantees the stable string key.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Award,
    Trophy,
    Sunrise,
    Clock,
    Flame,
    Crown,
    Medal,
    CheckCircle,
    Star,
    TrendingUp,
}

impl Icon {
    /// Stable renderer key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Award => "award",
            Self::Trophy => "trophy",
            Self::Sunrise => "sunrise",
            Self::Clock => "clock",
            Self::Flame => "flame",
            Self::Crown => "crown",
            Self::Medal => "medal",
            Self::CheckCircle => "check_circle",
            Self::Star => "star",
            Self::TrendingUp => "trending_up",
        }
    }

    /// Single-character glyph used by plain-text renderers.
    pub fn glyph(self) -> char {
        match self {
            Self::Award => '*',
            Self::Trophy => 'T',
            Self::Sunrise => '^',
            Self::Clock => '@',
            Self::Flame => '~',
            Self::Crown => 'W',
            Self::Medal => 'o',
            Self::CheckCircle => 'v',
            Self::Star => '+',
            Self::TrendingUp => '/',
        }
    }
}
