//! Ledger: ordered, append-only store of confirmed transactions.
//!
//! Canonical order is most-recent-first: `append` inserts at the head.
//!
//! Aggregates have different scopes:
//! - monthly spending / income: only transactions dated in the month of `as_of`,
//!   from the 1st up to and including `as_of`
//! - month spending for the budget check: the whole calendar month
//! - balance: the whole history

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::finance::{Transaction, TransactionType};
use crate::time::first_of_month;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted sequence (already most-recent-first).
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn append(&mut self, transaction: Transaction) {
        debug_assert!(transaction.amount >= 0.0, "ledger amounts are stored unsigned");
        self.transactions.insert(0, transaction);
    }

    /// Most-recent-first view
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn recent(&self, n: usize) -> &[Transaction] {
        &self.transactions[..n.min(self.transactions.len())]
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Attach advice to a confirmed transaction. Returns false if the id is unknown.
    pub fn set_advice(&mut self, id: &str, advice: impl Into<String>) -> bool {
        match self.transactions.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.advice = Some(advice.into());
                true
            }
            None => false,
        }
    }

    pub fn monthly_spending(&self, as_of: NaiveDate) -> f64 {
        self.month_to_date(as_of, TransactionType::Expense)
    }

    pub fn monthly_income(&self, as_of: NaiveDate) -> f64 {
        self.month_to_date(as_of, TransactionType::Income)
    }

    /// Expenses dated anywhere in the calendar month of `day`.
    pub fn spending_in_month(&self, day: NaiveDate) -> f64 {
        let start = first_of_month(day);
        self.transactions
            .iter()
            .filter(|t| t.is_expense() && first_of_month(t.date) == start)
            .map(|t| t.amount.abs())
            .sum()
    }

    /// Lifetime running total: income adds, expense subtracts.
    pub fn current_balance(&self) -> f64 {
        self.transactions
            .iter()
            .fold(0.0, |balance, t| balance + t.signed_amount())
    }

    pub fn expense_count(&self) -> usize {
        self.transactions.iter().filter(|t| t.is_expense()).count()
    }

    fn month_to_date(&self, as_of: NaiveDate, kind: TransactionType) -> f64 {
        let start = first_of_month(as_of);
        self.transactions
            .iter()
            .filter(|t| t.kind == kind && t.date >= start && t.date <= as_of)
            .map(|t| t.amount.abs())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{Category, NewTransaction};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn txn(id: &str, amount: f64, kind: TransactionType, date: NaiveDate) -> Transaction {
        NewTransaction::new(amount, "test", Category::Other, kind, date)
            .unwrap()
            .confirm(id)
    }

    #[test]
    fn test_append_is_most_recent_first() {
        let mut ledger = Ledger::new();
        ledger.append(txn("a", 10.0, TransactionType::Expense, d(2026, 2, 1)));
        ledger.append(txn("b", 20.0, TransactionType::Expense, d(2026, 2, 2)));
        assert_eq!(ledger.transactions()[0].id, "b");
        assert_eq!(ledger.transactions()[1].id, "a");
        assert_eq!(ledger.recent(1).len(), 1);
        assert_eq!(ledger.recent(10).len(), 2);
    }

    #[test]
    fn test_spending_in_month_covers_the_whole_month() {
        let mut ledger = Ledger::new();
        ledger.append(txn("a", 250.0, TransactionType::Expense, d(2026, 2, 20)));
        ledger.append(txn("b", 30.0, TransactionType::Expense, d(2026, 1, 31)));
        ledger.append(txn("c", 500.0, TransactionType::Income, d(2026, 2, 2)));
        assert_eq!(ledger.spending_in_month(d(2026, 2, 5)), 250.0);
        assert_eq!(ledger.monthly_spending(d(2026, 2, 5)), 0.0);
        assert_eq!(ledger.spending_in_month(d(2026, 1, 1)), 30.0);
    }

    #[test]
    fn test_balance_income_minus_expense() {
        let mut ledger = Ledger::new();
        ledger.append(txn("a", 500.0, TransactionType::Income, d(2026, 2, 1)));
        ledger.append(txn("b", 200.0, TransactionType::Expense, d(2026, 2, 2)));
        assert_eq!(ledger.current_balance(), 300.0);
    }

    #[test]
    fn test_balance_is_lifetime_but_spending_is_monthly() {
        let mut ledger = Ledger::new();
        ledger.append(txn("old", 100.0, TransactionType::Expense, d(2025, 11, 3)));
        ledger.append(txn("new", 40.0, TransactionType::Expense, d(2026, 2, 3)));
        assert_eq!(ledger.current_balance(), -140.0);
        assert_eq!(ledger.monthly_spending(d(2026, 2, 10)), 40.0);
    }

    #[test]
    fn test_spending_excludes_prior_month_within_31_days() {
        let mut ledger = Ledger::new();
        // Jan 31 is only 3 days before Feb 3 but falls in the prior month.
        ledger.append(txn("jan", 75.0, TransactionType::Expense, d(2026, 1, 31)));
        ledger.append(txn("feb", 25.0, TransactionType::Expense, d(2026, 2, 1)));
        assert_eq!(ledger.monthly_spending(d(2026, 2, 3)), 25.0);
    }

    #[test]
    fn test_month_window_is_bounded_by_as_of() {
        let mut ledger = Ledger::new();
        ledger.append(txn("early", 10.0, TransactionType::Income, d(2026, 3, 5)));
        ledger.append(txn("late", 90.0, TransactionType::Income, d(2026, 3, 20)));
        assert_eq!(ledger.monthly_income(d(2026, 3, 5)), 10.0);
        assert_eq!(ledger.monthly_income(d(2026, 3, 31)), 100.0);
        assert_eq!(ledger.monthly_spending(d(2026, 3, 31)), 0.0);
    }

    #[test]
    fn test_set_advice() {
        let mut ledger = Ledger::new();
        ledger.append(txn("a", 10.0, TransactionType::Expense, d(2026, 2, 1)));
        assert!(ledger.set_advice("a", "Nice"));
        assert!(!ledger.set_advice("missing", "Nice"));
        assert_eq!(ledger.get("a").unwrap().advice.as_deref(), Some("Nice"));
    }
}
