use crate::alert_store_client::PutAlert;
use crate::error::FraudDetectionError;
use crate::notification_client::{Notify, FRAUD_ALERT_SUBJECT};
use crate::risk::{evaluate, AlertRecord, RiskFlag};
use crate::time_window::TimeWindow;
use crate::transaction::{RecentTransaction, Transaction};
use crate::transaction_window_client::QueryRecent;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use tracing::{info, warn};

const ALERT_CREATED: &str = "Fraud alert created";
const TRANSACTION_CLEARED: &str = "Transaction cleared";

#[derive(Debug, PartialEq, Serialize)]
pub struct HandlerOutput {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

#[derive(Serialize)]
struct ReviewBody<'a> {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    risk_factors: Option<&'a BTreeSet<RiskFlag>>,
    requires_review: bool,
}

/// Published as sent by the producer: `amount` is the original JSON number and
/// `timestamp` the original text, not the parsed values.
#[derive(Serialize)]
struct FraudNotification<'a> {
    user_id: &'a str,
    transaction_id: &'a str,
    amount: &'a Number,
    risk_factors: &'a BTreeSet<RiskFlag>,
    timestamp: &'a str,
}

impl HandlerOutput {
    fn ok(body: &ReviewBody) -> Result<Self, FraudDetectionError> {
        Ok(HandlerOutput {
            status_code: 200,
            body: serde_json::to_string(body)?,
        })
    }
}

/// Scores one transaction event. The collaborators are built once per process
/// and shared by every invocation.
pub struct FraudHandler<Q, S, N> {
    transactions: Q,
    alerts: S,
    notifier: N,
}

impl<Q, S, N> FraudHandler<Q, S, N>
where
    Q: QueryRecent,
    S: PutAlert,
    N: Notify,
{
    pub fn new(transactions: Q, alerts: S, notifier: N) -> Self {
        FraudHandler {
            transactions,
            alerts,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        event: &Value,
        now: DateTime<Utc>,
    ) -> Result<HandlerOutput, FraudDetectionError> {
        let transaction = Transaction::from_event(event)?;
        let window = TimeWindow::try_from(now)?;

        let prior: Vec<RecentTransaction> = self
            .transactions
            .query_recent(&transaction.user_id, &window)
            .await?
            .into_iter()
            .filter(|recent| !recent.is(&transaction.transaction_id))
            .collect();

        let decision = evaluate(&transaction, &prior);
        match decision.alert {
            Some(alert) => {
                self.raise(&transaction, &alert).await?;
                HandlerOutput::ok(&ReviewBody {
                    message: ALERT_CREATED,
                    risk_factors: Some(&decision.risk_factors),
                    requires_review: true,
                })
            }
            None => {
                info!(
                    user_id = %transaction.user_id,
                    transaction_id = %transaction.transaction_id,
                    requires_review = decision.requires_review,
                    "transaction cleared"
                );
                HandlerOutput::ok(&ReviewBody {
                    message: TRANSACTION_CLEARED,
                    risk_factors: None,
                    requires_review: false,
                })
            }
        }
    }

    /// Stores the alert before announcing it.
    async fn raise(
        &self,
        transaction: &Transaction,
        alert: &AlertRecord,
    ) -> Result<(), FraudDetectionError> {
        let message = serde_json::to_string(&FraudNotification {
            user_id: &alert.user_id,
            transaction_id: &alert.transaction_id,
            amount: &transaction.reported_amount,
            risk_factors: &alert.risk_factors,
            timestamp: &transaction.reported_timestamp,
        })?;

        self.alerts.put_alert(alert).await?;
        self.notifier
            .publish(FRAUD_ALERT_SUBJECT, &message)
            .await
            .map_err(|error| {
                warn!(
                    transaction_id = %alert.transaction_id,
                    %error,
                    "alert stored but notification failed"
                );
                error
            })?;

        info!(
            user_id = %alert.user_id,
            transaction_id = %alert.transaction_id,
            location = ?transaction.location,
            risk_factors = ?alert.risk_factors,
            "fraud alert created"
        );
        Ok(())
    }
}
