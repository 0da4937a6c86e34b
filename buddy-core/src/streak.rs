//! Daily login streak.
//!
//! State machine keyed on `last_login_date`:
//! - same day again      -> no-op
//! - the day after       -> streak + 1
//! - anything else       -> streak restarts at 1
//!
//! `monthly_logins` holds every day the user showed up, as "YYYY-MM-DD"
//! strings when serialized.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::time::is_previous_day;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Already counted today; nothing changed.
    AlreadyRecorded,
    /// Logged in the day after the previous login.
    Advanced,
    /// First login ever, or the chain broke.
    Started,
}

impl LoginOutcome {
    pub fn counted(&self) -> bool {
        !matches!(self, LoginOutcome::AlreadyRecorded)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStreak {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_login_date: Option<NaiveDate>,
    pub total_logins: u32,
    pub monthly_logins: BTreeSet<NaiveDate>,
}

impl LoginStreak {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_login(&mut self, today: NaiveDate) -> LoginOutcome {
        let outcome = match self.last_login_date {
            Some(last) if last == today => return LoginOutcome::AlreadyRecorded,
            Some(last) if is_previous_day(last, today) => {
                self.current_streak += 1;
                LoginOutcome::Advanced
            }
            _ => {
                self.current_streak = 1;
                LoginOutcome::Started
            }
        };

        self.last_login_date = Some(today);
        self.total_logins += 1;
        self.monthly_logins.insert(today);
        self.longest_streak = self.longest_streak.max(self.current_streak);

        debug_assert!(self.longest_streak >= self.current_streak);
        outcome
    }

    pub fn has_logged_in(&self, day: NaiveDate) -> bool {
        self.monthly_logins.contains(&day)
    }

    /// Days of the given month with a recorded login, ascending.
    pub fn logins_in_month(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        self.monthly_logins
            .iter()
            .filter(|d| d.year() == year && d.month() == month)
            .copied()
            .collect()
    }
}
