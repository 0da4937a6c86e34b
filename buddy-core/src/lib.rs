//! buddy-core: transaction ledger, categorizer, and the gamification state
//! (login streak, plant health, achievements) that reacts to it.

pub mod achievements;
pub mod budget;
pub mod error;
pub mod finance;
pub mod goals;
pub mod health;
pub mod ledger;
pub mod streak;
pub mod time;

pub use achievements::{Achievement, AchievementKind, STREAK_LADDER, default_achievements};
pub use budget::{BudgetState, Confirmation, HabitReason, LoginReport};
pub use error::ValidationError;
pub use finance::{Category, NewTransaction, Transaction, TransactionDraft, TransactionType};
pub use goals::{Goal, NewGoal};
pub use health::{HabitKind, PlantHealth, Stage};
pub use ledger::Ledger;
pub use streak::{LoginOutcome, LoginStreak};

/// Keyword categorizer for transaction text
pub mod categorizer {
    use super::Category;

    /// Ordered keyword table. The first category with a matching keyword wins,
    /// so order is the tie-break (e.g. "fuel purchase" is Shopping).
    const RULES: &[(Category, &[&str])] = &[
        (
            Category::FoodDining,
            &["restaurant", "food", "cafe", "pizza", "burger", "swiggy", "zomato"],
        ),
        (
            Category::Shopping,
            &["amazon", "flipkart", "mall", "store", "shop", "purchase"],
        ),
        (
            Category::Transportation,
            &["uber", "ola", "taxi", "metro", "bus", "fuel", "petrol"],
        ),
        (
            Category::BillsUtilities,
            &["electricity", "water", "gas", "internet", "mobile", "recharge"],
        ),
        (
            Category::Entertainment,
            &["movie", "cinema", "netflix", "spotify", "game"],
        ),
        (
            Category::Healthcare,
            &["hospital", "pharmacy", "doctor", "medical"],
        ),
        (Category::Salary, &["salary", "wages", "payroll"]),
        (Category::Transfer, &["transfer", "upi", "neft", "imps"]),
    ];

    /// Case-insensitive substring match against the keyword table.
    /// Blank input is `Other`.
    pub fn categorize(text: &str) -> Category {
        if text.trim().is_empty() {
            return Category::Other;
        }
        let text = text.to_lowercase();

        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    /// Categorize a notification using both its raw text and the extracted
    /// description. Either part being blank yields `Other`.
    pub fn categorize_message(raw: &str, description: &str) -> Category {
        if raw.trim().is_empty() || description.trim().is_empty() {
            return Category::Other;
        }
        categorize(&format!("{raw} {description}"))
    }

}

pub use categorizer::{categorize, categorize_message};
