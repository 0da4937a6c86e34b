//! BudgetState: the aggregate root.
//!
//! Every mutation goes through `&mut BudgetState`, so a ledger append and the
//! habit event / achievement evaluation it triggers are applied as one unit.
//! Callers that share state across threads wrap the whole struct in a lock.
//!
//! Habit triggers per confirmed transaction (at most one event):
//! 1. expense that pushes month-to-date spending over the budget -> bad
//! 2. otherwise an expense above LARGE_EXPENSE_THRESHOLD          -> bad
//! 3. income                                                      -> good
//!
//! A counted login always fires one good event.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::achievements::{
    default_achievements, evaluate_savings, evaluate_spending, evaluate_streak, Achievement,
};
use crate::error::ValidationError;
use crate::finance::{NewTransaction, TransactionType};
use crate::goals::{Goal, NewGoal};
use crate::health::{HabitKind, PlantHealth};
use crate::ledger::Ledger;
use crate::streak::{LoginOutcome, LoginStreak};

pub const DEFAULT_MONTHLY_BUDGET: f64 = 3000.0;

/// Expenses strictly above this amount count as a bad habit.
/// Currency-unit agnostic.
pub const LARGE_EXPENSE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HabitReason {
    ExceededMonthlyBudget,
    LargeExpense,
    IncomeReceived,
    DailyLogin,
}

impl HabitReason {
    pub fn kind(&self) -> HabitKind {
        match self {
            HabitReason::ExceededMonthlyBudget | HabitReason::LargeExpense => HabitKind::Bad,
            HabitReason::IncomeReceived | HabitReason::DailyLogin => HabitKind::Good,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            HabitReason::ExceededMonthlyBudget => "Exceeded monthly budget",
            HabitReason::LargeExpense => "Large expense",
            HabitReason::IncomeReceived => "Income received",
            HabitReason::DailyLogin => "Daily login",
        }
    }
}

/// Result of confirming a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub transaction_id: String,
    pub habit: Option<HabitReason>,
    pub unlocked: Vec<String>,
}

/// Result of recording an app open
#[derive(Debug, Clone, PartialEq)]
pub struct LoginReport {
    pub outcome: LoginOutcome,
    pub current_streak: u32,
    pub unlocked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetState {
    #[serde(default)]
    pub transactions: Ledger,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default = "default_achievements")]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub login_streak: LoginStreak,
    #[serde(default)]
    pub plant_health: PlantHealth,
    #[serde(default = "default_budget")]
    pub monthly_budget: f64,
}

fn default_budget() -> f64 {
    DEFAULT_MONTHLY_BUDGET
}

impl Default for BudgetState {
    fn default() -> Self {
        Self {
            transactions: Ledger::new(),
            goals: Vec::new(),
            achievements: default_achievements(),
            login_streak: LoginStreak::new(),
            plant_health: PlantHealth::new(),
            monthly_budget: DEFAULT_MONTHLY_BUDGET,
        }
    }
}

impl BudgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monthly_budget(monthly_budget: f64) -> Self {
        Self {
            monthly_budget,
            ..Self::default()
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.transactions
    }

    pub fn monthly_spending(&self, as_of: NaiveDate) -> f64 {
        self.transactions.monthly_spending(as_of)
    }

    pub fn monthly_income(&self, as_of: NaiveDate) -> f64 {
        self.transactions.monthly_income(as_of)
    }

    pub fn current_balance(&self) -> f64 {
        self.transactions.current_balance()
    }

    /// Which habit event (if any) confirming `txn` fires, judged against the
    /// ledger as it stands before the append. The budget check covers the whole
    /// month `txn` is dated in, so a backdated expense still sees later spending.
    pub fn habit_for(&self, txn: &NewTransaction) -> Option<HabitReason> {
        match txn.kind() {
            TransactionType::Income => Some(HabitReason::IncomeReceived),
            TransactionType::Expense => {
                let amount = txn.amount().abs();
                let month_total = self.transactions.spending_in_month(txn.date()) + amount;
                if month_total > self.monthly_budget {
                    Some(HabitReason::ExceededMonthlyBudget)
                } else if amount > LARGE_EXPENSE_THRESHOLD {
                    Some(HabitReason::LargeExpense)
                } else {
                    None
                }
            }
        }
    }

    /// Append a validated transaction and apply everything it triggers.
    pub fn confirm_transaction(&mut self, txn: NewTransaction, now: DateTime<Utc>) -> Confirmation {
        let habit = self.habit_for(&txn);
        if let Some(reason) = habit {
            self.apply_habit(reason, now);
        }

        let id = Uuid::new_v4().to_string();
        let confirmed = txn.confirm(id.clone());
        info!(
            id = %confirmed.id,
            kind = %confirmed.kind,
            amount = confirmed.amount,
            category = %confirmed.category,
            "Transaction confirmed"
        );
        self.transactions.append(confirmed);

        let balance = self.current_balance();
        let mut unlocked = evaluate_savings(&mut self.achievements, balance, now);
        unlocked.extend(evaluate_spending(
            &mut self.achievements,
            self.transactions.expense_count(),
            now,
        ));
        log_unlocks(&unlocked);

        Confirmation {
            transaction_id: id,
            habit,
            unlocked,
        }
    }

    /// Record an app open on `today`. Counts at most once per calendar day.
    pub fn record_login(&mut self, today: NaiveDate, now: DateTime<Utc>) -> LoginReport {
        let outcome = self.login_streak.record_login(today);
        let current_streak = self.login_streak.current_streak;
        if !outcome.counted() {
            debug!(%today, "Login already recorded today");
            return LoginReport {
                outcome,
                current_streak,
                unlocked: Vec::new(),
            };
        }

        info!(?outcome, current_streak, "Daily login recorded");
        self.apply_habit(HabitReason::DailyLogin, now);
        let unlocked = evaluate_streak(&mut self.achievements, current_streak, now);
        log_unlocks(&unlocked);

        LoginReport {
            outcome,
            current_streak,
            unlocked,
        }
    }

    /// Attach advice to a confirmed transaction; false if the id is unknown.
    pub fn attach_advice(&mut self, transaction_id: &str, advice: impl Into<String>) -> bool {
        self.transactions.set_advice(transaction_id, advice)
    }

    pub fn set_monthly_budget(&mut self, amount: f64) -> Result<(), ValidationError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ValidationError::InvalidBudget(amount));
        }
        info!(amount, "Updated monthly budget");
        self.monthly_budget = amount;
        Ok(())
    }

    pub fn add_goal(&mut self, goal: NewGoal) -> &Goal {
        let goal = goal.into_goal(Uuid::new_v4().to_string());
        info!(id = %goal.id, title = %goal.title, "Goal added");
        self.goals.push(goal);
        &self.goals[self.goals.len() - 1]
    }

    pub fn update_goal_progress(&mut self, goal_id: &str, amount: f64) -> Result<&Goal, ValidationError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| ValidationError::UnknownGoal(goal_id.to_string()))?;
        goal.record_progress(amount)?;
        Ok(goal)
    }

    fn apply_habit(&mut self, reason: HabitReason, now: DateTime<Utc>) {
        let plant = self.plant_health.apply_habit(reason.kind(), now);
        info!(
            habit = ?reason.kind(),
            reason = reason.describe(),
            level = plant.level(),
            stage = ?plant.stage(),
            "Plant health updated"
        );
    }
}

fn log_unlocks(ids: &[String]) {
    for id in ids {
        info!(achievement = %id, "Achievement unlocked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::Category;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 9, 0, 0).unwrap()
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn expense(amount: f64, date: NaiveDate) -> NewTransaction {
        NewTransaction::new(amount, "Coffee", Category::FoodDining, TransactionType::Expense, date).unwrap()
    }

    fn income(amount: f64, date: NaiveDate) -> NewTransaction {
        NewTransaction::new(amount, "Paycheck", Category::Salary, TransactionType::Income, date).unwrap()
    }

    #[test]
    fn test_income_is_good_habit() {
        let mut s = BudgetState::new();
        let c = s.confirm_transaction(income(500.0, d(2, 10)), now());
        assert_eq!(c.habit, Some(HabitReason::IncomeReceived));
        assert_eq!(s.plant_health.level(), 55);
        assert_eq!(s.ledger().transactions()[0].id, c.transaction_id);
        assert!(c.unlocked.contains(&"savings-100".to_string()));
    }

    #[test]
    fn test_small_expense_fires_nothing() {
        let mut s = BudgetState::new();
        let c = s.confirm_transaction(expense(100.0, d(2, 10)), now());
        assert_eq!(c.habit, None);
        assert_eq!(s.plant_health.level(), 50);
        assert_eq!(s.plant_health.last_updated(), None);
        assert_eq!(c.unlocked, vec!["tracking-1".to_string()]);
    }

    #[test]
    fn test_large_expense_is_bad_habit() {
        let mut s = BudgetState::new();
        let c = s.confirm_transaction(expense(100.01, d(2, 10)), now());
        assert_eq!(c.habit, Some(HabitReason::LargeExpense));
        assert_eq!(s.plant_health.level(), 40);
        assert_eq!(s.plant_health.bad_habits(), 1);
    }

    #[test]
    fn test_budget_exceeded_takes_precedence_over_large_expense() {
        let mut s = BudgetState::with_monthly_budget(300.0);
        s.confirm_transaction(expense(90.0, d(2, 3)), now());
        s.confirm_transaction(expense(90.0, d(2, 4)), now());

        // 180 + 250 > 300 and 250 > 100: only one bad event, budget wins
        let c = s.confirm_transaction(expense(250.0, d(2, 5)), now());
        assert_eq!(c.habit, Some(HabitReason::ExceededMonthlyBudget));
        assert_eq!(s.plant_health.bad_habits(), 1);
        assert_eq!(s.plant_health.level(), 40);
    }

    #[test]
    fn test_budget_check_uses_the_transaction_month() {
        let mut s = BudgetState::with_monthly_budget(150.0);
        s.confirm_transaction(expense(90.0, d(1, 30)), now());
        let c = s.confirm_transaction(expense(90.0, d(2, 2)), now());
        assert_eq!(c.habit, None);
        let c = s.confirm_transaction(expense(90.0, d(2, 3)), now());
        assert_eq!(c.habit, Some(HabitReason::ExceededMonthlyBudget));
    }

    #[test]
    fn test_backdated_expense_sees_later_spending_in_its_month() {
        let mut s = BudgetState::with_monthly_budget(300.0);
        s.confirm_transaction(expense(250.0, d(2, 20)), now());
        let c = s.confirm_transaction(expense(90.0, d(2, 5)), now());
        assert_eq!(c.habit, Some(HabitReason::ExceededMonthlyBudget));
        assert_eq!(s.monthly_spending(d(2, 25)), 340.0);
        // Other months do not count.
        let c = s.confirm_transaction(expense(90.0, d(3, 1)), now());
        assert_eq!(c.habit, None);
    }

    #[test]
    fn test_balance_after_income_then_expense() {
        let mut s = BudgetState::new();
        s.confirm_transaction(income(500.0, d(2, 1)), now());
        s.confirm_transaction(expense(200.0, d(2, 2)), now());
        assert_eq!(s.current_balance(), 300.0);
        assert_eq!(s.monthly_spending(d(2, 28)), 200.0);
        assert_eq!(s.monthly_income(d(2, 28)), 500.0);
    }

    #[test]
    fn test_login_fires_good_habit_once_per_day() {
        let mut s = BudgetState::new();
        let r = s.record_login(d(2, 1), now());
        assert_eq!(r.outcome, LoginOutcome::Started);
        assert_eq!(s.plant_health.level(), 55);

        let r = s.record_login(d(2, 1), now());
        assert_eq!(r.outcome, LoginOutcome::AlreadyRecorded);
        assert_eq!(s.plant_health.level(), 55);
        assert_eq!(s.plant_health.good_habits(), 1);
        assert_eq!(s.login_streak.total_logins, 1);
    }

    #[test]
    fn test_login_streak_unlocks_achievements() {
        let mut s = BudgetState::new();
        let mut unlocked = Vec::new();
        for day in 1..=5 {
            unlocked.extend(s.record_login(d(2, day), now()).unlocked);
        }
        assert_eq!(unlocked, vec!["streak-3".to_string(), "streak-5".to_string()]);

        // Break the chain; unlocks stay.
        let r = s.record_login(d(2, 20), now());
        assert_eq!(r.current_streak, 1);
        let five = s.achievements.iter().find(|a| a.id == "streak-5").unwrap();
        assert!(five.is_unlocked);
        assert_eq!(s.login_streak.longest_streak, 5);
    }

    #[test]
    fn test_attach_advice_after_confirmation() {
        let mut s = BudgetState::new();
        let c = s.confirm_transaction(expense(12.0, d(2, 1)), now());
        assert!(s.ledger().get(&c.transaction_id).unwrap().advice.is_none());
        assert!(s.attach_advice(&c.transaction_id, "Looks fine"));
        assert_eq!(
            s.ledger().get(&c.transaction_id).unwrap().advice.as_deref(),
            Some("Looks fine")
        );
    }

    #[test]
    fn test_goals_and_budget() {
        let mut s = BudgetState::new();
        let id = s
            .add_goal(NewGoal::new("Laptop", 800.0, d(9, 1), "Tech", d(2, 1)).unwrap())
            .id
            .clone();
        let g = s.update_goal_progress(&id, 800.0).unwrap();
        assert!(g.is_completed);
        assert!(matches!(
            s.update_goal_progress("nope", 1.0),
            Err(ValidationError::UnknownGoal(_))
        ));

        assert!(s.set_monthly_budget(-1.0).is_err());
        s.set_monthly_budget(1200.0).unwrap();
        assert_eq!(s.monthly_budget, 1200.0);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut s = BudgetState::new();
        s.record_login(d(2, 1), now());
        s.confirm_transaction(expense(12.0, d(2, 1)), now());
        let json = serde_json::to_string(&s).unwrap();
        let back: BudgetState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let s: BudgetState = serde_json::from_str("{}").unwrap();
        assert_eq!(s.monthly_budget, DEFAULT_MONTHLY_BUDGET);
        assert_eq!(s.achievements.len(), default_achievements().len());
        assert!(s.ledger().is_empty());
    }
}
