//! Bank notification (SMS) parser
//!
//! Rules are tried in order; the first match wins:
//!   1. debited|withdrawn|spent|paid ... Rs. 1,234.56   -> expense
//!   2. credited|deposited|received ... Rs. 1,234.56    -> income
//!   3. purchase ... ₹1,234.56                          -> expense
//!
//! The currency marker is `rs`, `rs.` or `₹`. The amount may carry comma
//! group separators and an optional two-digit fraction.
//!
//! Example:
//!   Your account has been debited by Rs. 250.00 at STARBUCKS COFFEE on 2024-01-15.

use anyhow::Result;
use buddy_core::{TransactionDraft, TransactionType, categorize_message};
use chrono::NaiveDate;
use regex::Regex;

use crate::types::NotificationCapability;

const AMOUNT: &str = r"(?:\brs\.?|₹)\s*(?P<amount>\d+(?:,\d+)*(?:\.\d{2})?)";
const FALLBACK_DESCRIPTION: &str = "Transaction";

#[derive(Debug, Clone)]
struct Rule {
    re: Regex,
    kind: TransactionType,
}

#[derive(Debug, Clone)]
pub struct NotificationParser {
    capability: NotificationCapability,
    rules: Vec<Rule>,
    merchant_re: Regex,
}

impl NotificationParser {
    pub fn new(capability: NotificationCapability) -> Result<Self> {
        let rule = |vocabulary: &str, kind| -> Result<Rule> {
            Ok(Rule {
                re: Regex::new(&format!(r"(?i)(?:{vocabulary}).*?{AMOUNT}"))?,
                kind,
            })
        };

        let rules = vec![
            rule("debited|withdrawn|spent|paid", TransactionType::Expense)?,
            rule("credited|deposited|received", TransactionType::Income)?,
            rule("purchase", TransactionType::Expense)?,
        ];

        let merchant_re = Regex::new(r"(?i)\b(?:at|to|from)\s+(?P<merchant>[A-Za-z0-9\s]+)")?;

        Ok(Self {
            capability,
            rules,
            merchant_re,
        })
    }

    pub fn capability(&self) -> NotificationCapability {
        self.capability
    }

    /// Parse one notification into a draft dated `received_on`.
    ///
    /// `None` means no transaction was detected, which includes every message
    /// on a host without the notification capability.
    pub fn parse(&self, raw: &str, received_on: NaiveDate) -> Option<TransactionDraft> {
        if !self.capability.is_available() {
            return None;
        }

        let (caps, kind) = self
            .rules
            .iter()
            .find_map(|rule| rule.re.captures(raw).map(|caps| (caps, rule.kind)))?;

        let amount: f64 = caps["amount"].replace(',', "").parse().ok()?;
        let description = self.merchant(raw);
        let category = categorize_message(raw, &description);

        Some(TransactionDraft {
            amount,
            description,
            category,
            kind,
            date: received_on,
            sms_content: Some(raw.to_string()),
        })
    }

    fn merchant(&self, raw: &str) -> String {
        self.merchant_re
            .captures(raw)
            .map(|caps| caps["merchant"].trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::Category;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
    }

    fn parser() -> NotificationParser {
        NotificationParser::new(NotificationCapability::Available).unwrap()
    }

    #[test]
    fn test_parse_debit() {
        let sms = "Your account has been debited by Rs. 250.00 at STARBUCKS COFFEE on 2024-01-15. Available balance: Rs. 5,750.00";
        let d = parser().parse(sms, day()).unwrap();
        assert_eq!(d.kind, TransactionType::Expense);
        assert_eq!(d.amount, 250.00);
        assert_eq!(d.description, "STARBUCKS COFFEE on 2024");
        assert_eq!(d.date, day());
        assert_eq!(d.sms_content.as_deref(), Some(sms));
    }

    #[test]
    fn test_parse_credit_with_separators() {
        let sms = "Your account has been credited with Rs. 1,200.00 from SALARY DEPOSIT.";
        let d = parser().parse(sms, day()).unwrap();
        assert_eq!(d.kind, TransactionType::Income);
        assert_eq!(d.amount, 1200.00);
        assert_eq!(d.description, "SALARY DEPOSIT");
        assert_eq!(d.category, Category::Salary);
    }

    #[test]
    fn test_parse_purchase() {
        let sms = "Purchase of Rs. 85.50 at AMAZON INDIA on 2024-01-15 using your card ending 1234.";
        let d = parser().parse(sms, day()).unwrap();
        assert_eq!(d.kind, TransactionType::Expense);
        assert_eq!(d.amount, 85.50);
        assert_eq!(d.category, Category::Shopping);
    }

    #[test]
    fn test_amount_formats() {
        let p = parser();
        let cases = [
            ("Amount spent Rs. 1,200.00 today", 1200.00),
            ("Amount spent Rs 1,00,000 today", 100000.0),
            ("Amount spent rs.42 today", 42.0),
            ("You spent ₹1,234.56 at CAFE COFFEE DAY", 1234.56),
        ];
        for (sms, expected) in cases {
            let d = p.parse(sms, day()).unwrap_or_else(|| panic!("no match for {sms}"));
            assert_eq!(d.amount, expected, "{sms}");
        }
    }

    #[test]
    fn test_debit_rule_wins_over_credit() {
        let sms = "Refund credited Rs. 500.00 after you paid Rs. 200.00 to ACME STORE";
        let d = parser().parse(sms, day()).unwrap();
        assert_eq!(d.kind, TransactionType::Expense);
        assert_eq!(d.amount, 200.00);
        assert_eq!(d.description, "ACME STORE");
    }

    #[test]
    fn test_rupee_sign_and_category() {
        let d = parser().parse("You spent ₹1,234.56 at CAFE COFFEE DAY", day()).unwrap();
        assert_eq!(d.description, "CAFE COFFEE DAY");
        assert_eq!(d.category, Category::FoodDining);
    }

    #[test]
    fn test_description_falls_back() {
        let d = parser().parse("Card debited Rs 40.00 via POS", day()).unwrap();
        assert_eq!(d.description, "Transaction");
    }

    #[test]
    fn test_no_match_is_none() {
        let p = parser();
        assert!(p.parse("Your OTP is 482913. Do not share it.", day()).is_none());
        assert!(p.parse("debited 500 from your account", day()).is_none());
        assert!(p.parse("", day()).is_none());
    }

    #[test]
    fn test_unavailable_capability_always_none() {
        let p = NotificationParser::new(NotificationCapability::Unavailable).unwrap();
        let sms = "Your account has been debited by Rs. 250.00 at STARBUCKS";
        assert!(p.parse(sms, day()).is_none());
    }
}
