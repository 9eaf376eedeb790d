//! Fraud risk policy.
//!
//! [`evaluate`] is a pure function of one transaction and the user's trailing
//! window. It never talks to AWS; the handler persists and publishes whatever
//! alert it returns.

use crate::transaction::{RecentTransaction, Transaction};
use crate::window_summary::WindowSummary;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

pub const HIGH_VALUE_THRESHOLD: i64 = 10_000;
pub const HIGH_FREQUENCY_THRESHOLD: usize = 10;
pub const VELOCITY_THRESHOLD: i64 = 20_000;

/// Ordered so that a set of flags always serializes in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    HighValueTransaction,
    HighFrequency,
    VelocityCheckFailed,
}

impl RiskFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::HighValueTransaction => "HIGH_VALUE_TRANSACTION",
            RiskFlag::HighFrequency => "HIGH_FREQUENCY",
            RiskFlag::VelocityCheckFailed => "VELOCITY_CHECK_FAILED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    FraudDetection,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::FraudDetection => "FRAUD_DETECTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    PendingReview,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::PendingReview => "PENDING_REVIEW",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub user_id: String,
    pub transaction_id: String,
    pub alert_type: AlertType,
    pub risk_factors: BTreeSet<RiskFlag>,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub risk_factors: BTreeSet<RiskFlag>,
    pub requires_review: bool,
    pub alert: Option<AlertRecord>,
}

pub fn evaluate(transaction: &Transaction, recent: &[RecentTransaction]) -> Decision {
    let summary = WindowSummary::from_transactions(recent);
    let mut risk_factors = BTreeSet::new();

    if transaction.amount > BigDecimal::from(HIGH_VALUE_THRESHOLD) {
        risk_factors.insert(RiskFlag::HighValueTransaction);
    }
    if summary.count > HIGH_FREQUENCY_THRESHOLD {
        risk_factors.insert(RiskFlag::HighFrequency);
    }
    if summary.total > BigDecimal::from(VELOCITY_THRESHOLD) {
        risk_factors.insert(RiskFlag::VelocityCheckFailed);
    }

    let requires_review = !risk_factors.is_empty();
    let alert = if requires_review {
        Some(AlertRecord {
            user_id: transaction.user_id.clone(),
            transaction_id: transaction.transaction_id.clone(),
            alert_type: AlertType::FraudDetection,
            risk_factors: risk_factors.clone(),
            timestamp: transaction.timestamp,
            status: AlertStatus::PendingReview,
        })
    } else {
        None
    };

    Decision {
        risk_factors,
        requires_review,
        alert,
    }
}

#[cfg(test)]
mod tests {
    use crate::risk::{evaluate, AlertStatus, AlertType, Decision, RiskFlag};
    use crate::transaction::{RecentTransaction, Transaction};
    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn transaction(amount: &str) -> Transaction {
        Transaction {
            user_id: "user-1".to_string(),
            transaction_id: "txn-1".to_string(),
            amount: BigDecimal::from_str(amount).unwrap(),
            reported_amount: serde_json::from_str(amount).unwrap(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            reported_timestamp: "2024-03-01T12:00:00Z".to_string(),
            location: None,
        }
    }

    fn window(amounts: &[&str]) -> Vec<RecentTransaction> {
        amounts
            .iter()
            .enumerate()
            .map(|(index, amount)| RecentTransaction {
                transaction_id: Some(format!("prior-{}", index)),
                amount: BigDecimal::from_str(amount).unwrap(),
            })
            .collect()
    }

    fn flags(flags: &[RiskFlag]) -> BTreeSet<RiskFlag> {
        flags.iter().cloned().collect()
    }

    #[test]
    fn test_clean_transaction() {
        let decision = evaluate(&transaction("500"), &[]);
        assert_eq!(
            decision,
            Decision {
                risk_factors: BTreeSet::new(),
                requires_review: false,
                alert: None,
            }
        );
    }

    #[test]
    fn test_high_value_only() {
        let decision = evaluate(&transaction("15000"), &[]);
        assert_eq!(decision.risk_factors, flags(&[RiskFlag::HighValueTransaction]));
        assert!(decision.requires_review);

        let alert = decision.alert.unwrap();
        assert_eq!(alert.user_id, "user-1");
        assert_eq!(alert.transaction_id, "txn-1");
        assert_eq!(alert.alert_type, AlertType::FraudDetection);
        assert_eq!(alert.status, AlertStatus::PendingReview);
        assert_eq!(alert.risk_factors, flags(&[RiskFlag::HighValueTransaction]));
        assert_eq!(alert.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_frequency_trip() {
        let decision = evaluate(&transaction("100"), &window(&["50"; 11]));
        assert_eq!(decision.risk_factors, flags(&[RiskFlag::HighFrequency]));
        assert!(decision.requires_review);
    }

    #[test]
    fn test_combined_flags() {
        let mut amounts = vec!["2000"; 10];
        amounts.push("1000");
        let decision = evaluate(&transaction("12000"), &window(&amounts));
        assert_eq!(
            decision.risk_factors,
            flags(&[
                RiskFlag::HighValueTransaction,
                RiskFlag::HighFrequency,
                RiskFlag::VelocityCheckFailed,
            ])
        );
        assert!(decision.alert.is_some());
    }

    #[test]
    fn test_high_value_boundary() {
        assert!(evaluate(&transaction("10000"), &[]).risk_factors.is_empty());
        assert_eq!(
            evaluate(&transaction("10000.01"), &[]).risk_factors,
            flags(&[RiskFlag::HighValueTransaction])
        );
    }

    #[test]
    fn test_frequency_boundary() {
        assert!(evaluate(&transaction("1"), &window(&["1"; 10]))
            .risk_factors
            .is_empty());
        assert_eq!(
            evaluate(&transaction("1"), &window(&["1"; 11])).risk_factors,
            flags(&[RiskFlag::HighFrequency])
        );
    }

    #[test]
    fn test_velocity_boundary() {
        assert!(evaluate(&transaction("1"), &window(&["10000", "10000"]))
            .risk_factors
            .is_empty());
        assert_eq!(
            evaluate(&transaction("1"), &window(&["10000", "10000.01"])).risk_factors,
            flags(&[RiskFlag::VelocityCheckFailed])
        );
    }

    #[test]
    fn test_current_amount_is_not_part_of_velocity() {
        let decision = evaluate(&transaction("10000"), &window(&["10000.01"]));
        assert!(decision.risk_factors.is_empty());
    }

    #[test]
    fn test_flags_are_independent() {
        let amounts = ["1", "15000"];
        let windows = [window(&[]), window(&["1"; 11]), window(&["25000"])];
        for amount in amounts.iter() {
            for recent in windows.iter() {
                let decision = evaluate(&transaction(amount), recent);
                let high_value = evaluate(&transaction(amount), &[])
                    .risk_factors
                    .contains(&RiskFlag::HighValueTransaction);
                assert_eq!(
                    decision.risk_factors.contains(&RiskFlag::HighValueTransaction),
                    high_value
                );
                let window_only = evaluate(&transaction("1"), recent).risk_factors;
                assert_eq!(
                    decision.risk_factors.contains(&RiskFlag::HighFrequency),
                    window_only.contains(&RiskFlag::HighFrequency)
                );
                assert_eq!(
                    decision.risk_factors.contains(&RiskFlag::VelocityCheckFailed),
                    window_only.contains(&RiskFlag::VelocityCheckFailed)
                );
            }
        }
    }

    #[test]
    fn test_alert_matches_review() {
        let cases = vec![
            ("500", window(&[])),
            ("10000.01", window(&[])),
            ("1", window(&["1"; 11])),
            ("1", window(&["20000.01"])),
        ];
        for (amount, recent) in cases {
            let decision = evaluate(&transaction(amount), &recent);
            assert_eq!(decision.requires_review, !decision.risk_factors.is_empty());
            assert_eq!(decision.alert.is_some(), decision.requires_review);
            if let Some(alert) = decision.alert.as_ref() {
                assert_eq!(alert.risk_factors, decision.risk_factors);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let recent = window(&["9000", "9000", "9000"]);
        assert_eq!(
            evaluate(&transaction("11000"), &recent),
            evaluate(&transaction("11000"), &recent)
        );
    }

    #[test]
    fn test_risk_factors_serialize_in_order() {
        let all = flags(&[
            RiskFlag::VelocityCheckFailed,
            RiskFlag::HighValueTransaction,
            RiskFlag::HighFrequency,
        ]);
        assert_eq!(
            serde_json::to_string(&all).unwrap(),
            r#"["HIGH_VALUE_TRANSACTION","HIGH_FREQUENCY","VELOCITY_CHECK_FAILED"]"#
        );
        for flag in all.iter() {
            assert_eq!(
                serde_json::to_value(flag).unwrap(),
                serde_json::Value::String(flag.as_str().to_string())
            );
        }
    }
}
