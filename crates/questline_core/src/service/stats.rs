//! Derived daily statistics.

use crate::model::icon::Icon;
use crate::model::profile::UserProfile;
use crate::model::task::Task;
use chrono::{Datelike, NaiveDate};

const MOTIVATIONAL_QUOTES: &[&str] = &[
    "Discipline is the bridge between goals and accomplishment.",
    "Every day is a new chance to get better.",
    "Small steps every day lead to big results.",
    "You are stronger than you think. Keep going!",
    "Success is the sum of small efforts repeated day in and day out.",
];

/// Completion counters for the current task list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyStats {
    pub completed: usize,
    pub total: usize,
    /// `completed / total`; `0.0` for an empty list.
    pub fraction: f64,
}

impl DailyStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let fraction = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            completed,
            total,
            fraction,
        }
    }

    pub fn all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// One labelled statistic for the stats view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTile {
    pub label: &'static str,
    pub value: String,
    pub icon: Icon,
}

pub fn stat_tiles(tasks: &[Task], profile: &UserProfile) -> Vec<StatTile> {
    let daily = DailyStats::from_tasks(tasks);
    vec![
        StatTile {
            label: "Tasks completed",
            value: format!("{}/{}", daily.completed, daily.total),
            icon: Icon::CheckCircle,
        },
        StatTile {
            label: "Points earned",
            value: profile.points.to_string(),
            icon: Icon::Star,
        },
        StatTile {
            label: "Current level",
            value: profile.level().to_string(),
            icon: Icon::TrendingUp,
        },
        StatTile {
            label: "Day streak",
            value: profile.streak_days.to_string(),
            icon: Icon::Flame,
        },
    ]
}

/// Quote of the day; stable for a given date.
pub fn quote_for_date(date: NaiveDate) -> &'static str {
    let index = date.num_days_from_ce().unsigned_abs() as usize % MOTIVATIONAL_QUOTES.len();
    MOTIVATIONAL_QUOTES[index]
}
