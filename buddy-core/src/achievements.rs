//! Threshold achievements.
//!
//! Unlocking is one-way: once `is_unlocked` is set, no evaluation clears it,
//! and `current` / `unlocked_at` are only written at the moment of unlock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login-streak targets (days) checked on every counted login.
pub const STREAK_LADDER: [u32; 5] = [3, 5, 7, 14, 30];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    LoginStreak,
    /// Lifetime balance milestones
    Savings,
    /// Expense-tracking milestones (number of expenses logged)
    Spending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub target: f64,
    pub current: f64,
    pub is_unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub icon: String,
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: AchievementKind,
        target: f64,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            kind,
            target,
            current: 0.0,
            is_unlocked: false,
            unlocked_at: None,
            icon: icon.into(),
        }
    }

    /// Progress toward the target in percent, capped at 100.
    /// `metric` is the live value for this kind (streak, balance, expense count).
    pub fn progress_pct(&self, metric: f64) -> f64 {
        if self.is_unlocked {
            return 100.0;
        }
        if self.target <= 0.0 || !metric.is_finite() {
            return 0.0;
        }
        (metric / self.target * 100.0).clamp(0.0, 100.0)
    }

    fn unlock(&mut self, value: f64, now: DateTime<Utc>) {
        self.is_unlocked = true;
        self.current = value;
        self.unlocked_at = Some(now);
    }
}

/// The catalogue a fresh state starts with.
pub fn default_achievements() -> Vec<Achievement> {
    let streaks = [
        (3, "Getting Started", "Log in 3 days in a row", "🔥"),
        (5, "Building Momentum", "Log in 5 days in a row", "⚡"),
        (7, "Week Warrior", "Log in 7 days in a row", "📅"),
        (14, "Fortnight Focus", "Log in 14 days in a row", "💪"),
        (30, "Monthly Master", "Log in 30 days in a row", "👑"),
    ];
    let savings = [
        (100.0, "First Hundred", "Reach a balance of 100", "💰"),
        (1000.0, "Four Digits", "Reach a balance of 1,000", "🏦"),
        (5000.0, "Safety Net", "Reach a balance of 5,000", "🛡️"),
    ];
    let tracking = [
        (1.0, "First Step", "Log your first expense", "📝"),
        (10.0, "Tracker", "Log 10 expenses", "📊"),
        (50.0, "Bookkeeper", "Log 50 expenses", "📚"),
    ];

    let mut out = Vec::new();
    for (days, title, desc, icon) in streaks {
        out.push(Achievement::new(
            format!("streak-{days}"),
            title,
            desc,
            AchievementKind::LoginStreak,
            days as f64,
            icon,
        ));
    }
    for (amount, title, desc, icon) in savings {
        out.push(Achievement::new(
            format!("savings-{amount}"),
            title,
            desc,
            AchievementKind::Savings,
            amount,
            icon,
        ));
    }
    for (count, title, desc, icon) in tracking {
        out.push(Achievement::new(
            format!("tracking-{count}"),
            title,
            desc,
            AchievementKind::Spending,
            count,
            icon,
        ));
    }
    out
}

/// Unlock every locked login-streak achievement on the ladder whose target
/// is at or below `streak`. Thresholds are checked independently, so several
/// may unlock in one call. Returns the ids unlocked by this call.
pub fn evaluate_streak(
    achievements: &mut [Achievement],
    streak: u32,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut unlocked = Vec::new();
    for target in STREAK_LADDER {
        if streak < target {
            continue;
        }
        for a in achievements.iter_mut() {
            if a.kind == AchievementKind::LoginStreak
                && !a.is_unlocked
                && a.target == target as f64
            {
                a.unlock(streak as f64, now);
                unlocked.push(a.id.clone());
            }
        }
    }
    unlocked
}

pub fn evaluate_savings(
    achievements: &mut [Achievement],
    balance: f64,
    now: DateTime<Utc>,
) -> Vec<String> {
    evaluate_kind(achievements, AchievementKind::Savings, balance, now)
}

pub fn evaluate_spending(
    achievements: &mut [Achievement],
    expenses_logged: usize,
    now: DateTime<Utc>,
) -> Vec<String> {
    evaluate_kind(achievements, AchievementKind::Spending, expenses_logged as f64, now)
}

fn evaluate_kind(
    achievements: &mut [Achievement],
    kind: AchievementKind,
    metric: f64,
    now: DateTime<Utc>,
) -> Vec<String> {
    debug_assert!(metric.is_finite(), "achievement metric must be finite");
    achievements
        .iter_mut()
        .filter(|a| a.kind == kind && !a.is_unlocked && a.target <= metric)
        .map(|a| {
            a.unlock(metric, now);
            a.id.clone()
        })
        .collect()
}
