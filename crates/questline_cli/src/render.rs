//! Plain-text rendering of session state.

use questline_core::{
    quote_for_date, rank_name, Clock, Notice, NoticeLevel, Notifier, Reminder, Session,
    TrackerStore, RANKS,
};

const BAR_WIDTH: usize = 24;

pub fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn tasks<S: TrackerStore, C: Clock>(session: &Session<S, C>) {
    let daily = session.daily_stats();
    println!(
        "Today's schedule  {}/{}  {}",
        daily.completed,
        daily.total,
        progress_bar(daily.fraction)
    );
    for task in session.tasks() {
        let mark = if task.completed { 'x' } else { ' ' };
        let bell = if task.notification_enabled { "" } else { "  (muted)" };
        println!(
            "[{mark}] #{:<4} {}  {:<28} {:<14} +{} pts{bell}",
            task.id, task.time, task.title, task.category, task.points
        );
    }
}

pub fn profile<S: TrackerStore, C: Clock>(session: &Session<S, C>, today: chrono::NaiveDate) {
    let progress = session.level_progress();
    println!("{} (level {})", progress.rank_name, progress.level);
    println!("{} points", progress.points);
    println!(
        "Next level: {} points to go  {}",
        progress.points_to_next,
        progress_bar(progress.fraction)
    );
    if let Some(profile) = session.profile() {
        println!("Streak: {} days", profile.streak_days);
    }
    println!();
    println!("\"{}\"", quote_for_date(today));
}

pub fn achievements<S: TrackerStore, C: Clock>(session: &Session<S, C>) {
    let Some(profile) = session.profile() else {
        return;
    };
    println!(
        "Achievements {}/{}",
        profile.unlocked_count(),
        profile.achievements.len()
    );
    for achievement in &profile.achievements {
        let state = if achievement.unlocked { "unlocked" } else { "locked" };
        println!(
            "{} {:<20} {:<9} {}",
            achievement.icon().glyph(),
            achievement.title,
            state,
            achievement.description
        );
    }
}

pub fn ranks(current_level: u32) {
    for rank in RANKS {
        let marker = if rank.level == current_level { '>' } else { ' ' };
        println!(
            "{marker} {} {:<13} from {} points",
            rank.level, rank.name, rank.min_points
        );
    }
    println!("You are: {}", rank_name(current_level));
}

pub fn stats<S: TrackerStore, C: Clock>(session: &Session<S, C>) {
    for tile in session.stat_tiles() {
        println!("{} {:<16} {}", tile.icon.glyph(), tile.label, tile.value);
    }
}

pub fn notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => println!("{notice}"),
            NoticeLevel::Error => eprintln!("error: {notice}"),
        }
    }
}

/// Prints reminders to the terminal with a bell.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, reminder: &Reminder) {
        println!(
            "\x07[{}] Reminder: {}",
            reminder.due_at.format("%H:%M"),
            reminder.title
        );
    }
}
