//! Savings goals

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub category: String,
    /// Monotonic: set once `current_amount` reaches the target, never cleared
    pub is_completed: bool,
}

impl Goal {
    /// Record progress, clamped to `[0, target_amount]`.
    pub fn record_progress(&mut self, amount: f64) -> Result<(), ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidProgress);
        }
        self.current_amount = amount.clamp(0.0, self.target_amount);
        if self.current_amount >= self.target_amount {
            self.is_completed = true;
        }
        Ok(())
    }

    pub fn progress_pct(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
    }

    /// Days from `today` to the deadline; negative once it has passed.
    pub fn days_until_deadline(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }
}

/// Validated input for a new goal
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    title: String,
    target_amount: f64,
    deadline: NaiveDate,
    category: String,
}

impl NewGoal {
    pub fn new(
        title: impl Into<String>,
        target_amount: f64,
        deadline: NaiveDate,
        category: impl Into<String>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyGoalTitle);
        }
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(ValidationError::NonPositiveTarget(target_amount));
        }
        if deadline <= today {
            return Err(ValidationError::DeadlineNotInFuture(deadline));
        }
        let category = category.into().trim().to_string();
        Ok(Self {
            title,
            target_amount,
            deadline,
            category: if category.is_empty() { "Savings".to_string() } else { category },
        })
    }

    pub fn into_goal(self, id: impl Into<String>) -> Goal {
        Goal {
            id: id.into(),
            title: self.title,
            target_amount: self.target_amount,
            current_amount: 0.0,
            deadline: self.deadline,
            category: self.category,
            is_completed: false,
        }
    }
}
