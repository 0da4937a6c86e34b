//! Validation errors for user-supplied input

use thiserror::Error;

/// Rejections raised before anything reaches the ledger or goal list.
/// Each variant is user-correctable; nothing is silently coerced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("amount is not a number: {0:?}")]
    InvalidAmount(String),

    #[error("amount must be a finite number")]
    NonFiniteAmount,

    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(f64),

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("unknown transaction type: {0:?} (expected income or expense)")]
    UnknownTransactionType(String),

    #[error("goal title cannot be empty")]
    EmptyGoalTitle,

    #[error("goal target must be greater than zero (got {0})")]
    NonPositiveTarget(f64),

    #[error("goal deadline {0} must be after today")]
    DeadlineNotInFuture(chrono::NaiveDate),

    #[error("goal progress must be a finite number")]
    InvalidProgress,

    #[error("monthly budget must be zero or more (got {0})")]
    InvalidBudget(f64),

    #[error("no goal with id {0}")]
    UnknownGoal(String),
}
