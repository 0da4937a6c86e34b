//! Transaction types for the ledger and the notification parser

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// A confirmed ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Assigned at confirmation time
    pub id: String,
    /// Always non-negative; the sign lives in `kind`
    pub amount: f64,
    pub description: String,
    pub category: Category,
    /// Calendar day of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Annotation filled in after confirmation by the advice worker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    /// Raw notification text this entry was parsed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_content: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Amount with the sign implied by the type: income adds, expense subtracts.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount.abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ValidationError::UnknownTransactionType(other.to_string())),
        }
    }
}

/// Spending categories assigned by keyword match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Salary")]
    Salary,
    #[serde(rename = "Transfer")]
    Transfer,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::FoodDining,
        Category::Shopping,
        Category::Transportation,
        Category::BillsUtilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Salary,
        Category::Transfer,
        Category::Other,
    ];

    /// Display label, also the persisted form
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Shopping => "Shopping",
            Category::Transportation => "Transportation",
            Category::BillsUtilities => "Bills & Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Salary => "Salary",
            Category::Transfer => "Transfer",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup by display label
    pub fn from_label(label: &str) -> Option<Category> {
        let needle = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unconfirmed candidate produced by the notification parser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub amount: f64,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_content: Option<String>,
}

/// A validated transaction ready to be appended.
///
/// Only constructible through [`NewTransaction::new`] / [`NewTransaction::from_input`]
/// or from a draft, so the ledger never sees a negative amount or a blank description.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    amount: f64,
    description: String,
    category: Category,
    kind: TransactionType,
    date: NaiveDate,
    sms_content: Option<String>,
}

impl NewTransaction {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: Category,
        kind: TransactionType,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(Self {
            amount,
            description,
            category,
            kind,
            date,
            sms_content: None,
        })
    }

    /// Validate raw form input. The amount text must be a plain number
    /// (thousands separators are accepted).
    pub fn from_input(
        amount_text: &str,
        description: &str,
        category: Category,
        kind: TransactionType,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let cleaned = amount_text.trim().replace(',', "");
        let amount: f64 = cleaned
            .parse()
            .map_err(|_| ValidationError::InvalidAmount(amount_text.trim().to_string()))?;
        Self::new(amount, description, category, kind, date)
    }

    pub fn from_draft(draft: TransactionDraft) -> Result<Self, ValidationError> {
        let mut txn = Self::new(
            draft.amount,
            draft.description,
            draft.category,
            draft.kind,
            draft.date,
        )?;
        txn.sms_content = draft.sms_content;
        Ok(txn)
    }

    pub fn with_sms_content(mut self, raw: impl Into<String>) -> Self {
        self.sms_content = Some(raw.into());
        self
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Attach an identifier, producing the immutable ledger entry.
    pub fn confirm(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            amount: self.amount,
            description: self.description,
            category: self.category,
            date: self.date,
            kind: self.kind,
            advice: None,
            sms_content: self.sms_content,
        }
    }
}
