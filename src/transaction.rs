use crate::error::FraudDetectionError;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rusoto_dynamodb::AttributeValue;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::str::FromStr;

/// One incoming transaction, validated. Only [`Transaction::try_from`] builds it,
/// so every value in hand has its required fields and a non-negative amount.
///
/// `reported_amount` and `reported_timestamp` keep the values exactly as the
/// producer sent them, for echoing back in notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub user_id: String,
    pub transaction_id: String,
    pub amount: BigDecimal,
    pub reported_amount: Number,
    pub timestamp: DateTime<Utc>,
    pub reported_timestamp: String,
    pub location: Option<String>,
}

/// A prior transaction of the same user, as read back from the window store.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentTransaction {
    pub transaction_id: Option<String>,
    pub amount: BigDecimal,
}

impl Transaction {
    /// Reads the transaction out of an invocation event's `body` string.
    pub fn from_event(event: &Value) -> Result<Self, FraudDetectionError> {
        let body = event
            .get("body")
            .ok_or_else(|| malformed("missing field `body`"))?
            .as_str()
            .ok_or_else(|| malformed("field `body` is not a string"))?;
        let value: Value = serde_json::from_str(body)
            .map_err(|error| FraudDetectionError::MalformedInput(error.to_string()))?;
        Transaction::try_from(&value)
    }
}

impl TryFrom<&Value> for Transaction {
    type Error = FraudDetectionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        // No check reads `location`, so a value of the wrong type is dropped.
        let location = value
            .get("location")
            .and_then(Value::as_str)
            .map(str::to_string);
        let (reported_amount, amount) = parse_amount(value.get("amount"))?;
        let reported_timestamp = required_str(value, "timestamp")?;
        Ok(Transaction {
            user_id: required_str(value, "user_id")?.to_string(),
            transaction_id: required_str(value, "transaction_id")?.to_string(),
            amount,
            reported_amount,
            timestamp: parse_timestamp(reported_timestamp)?,
            reported_timestamp: reported_timestamp.to_string(),
            location,
        })
    }
}

impl RecentTransaction {
    pub fn is(&self, transaction_id: &str) -> bool {
        self.transaction_id.as_deref() == Some(transaction_id)
    }
}

impl TryFrom<HashMap<String, AttributeValue>> for RecentTransaction {
    type Error = FraudDetectionError;

    fn try_from(item: HashMap<String, AttributeValue>) -> Result<Self, Self::Error> {
        // Older writers stored the amount as a string attribute.
        let amount = item
            .get("amount")
            .and_then(|attribute| attribute.n.as_ref().or_else(|| attribute.s.as_ref()))
            .ok_or_else(|| {
                FraudDetectionError::MalformedWindowItem("missing field `amount`".to_string())
            })?;
        let amount = BigDecimal::from_str(amount).map_err(|_| {
            FraudDetectionError::MalformedWindowItem(format!("`{}` is not a number", amount))
        })?;
        let transaction_id = item
            .get("transaction_id")
            .and_then(|attribute| attribute.s.clone());
        Ok(RecentTransaction {
            transaction_id,
            amount,
        })
    }
}

fn malformed(reason: &str) -> FraudDetectionError {
    FraudDetectionError::MalformedInput(reason.to_string())
}

fn required_str<'a>(value: &'a Value, field: &str) -> Result<&'a str, FraudDetectionError> {
    match value.get(field) {
        Some(Value::String(text)) => Ok(text),
        None | Some(Value::Null) => Err(malformed(&format!("missing field `{}`", field))),
        Some(_) => Err(malformed(&format!("field `{}` is not a string", field))),
    }
}

fn parse_amount(value: Option<&Value>) -> Result<(Number, BigDecimal), FraudDetectionError> {
    let number = match value {
        Some(Value::Number(number)) => number,
        None | Some(Value::Null) => return Err(malformed("missing field `amount`")),
        Some(_) => return Err(malformed("field `amount` is not a number")),
    };
    // serde_json prints the shortest representation that reads back to the same
    // value, so 10000.01 stays 10000.01 here.
    let amount = BigDecimal::from_str(&number.to_string())
        .map_err(|_| malformed("field `amount` is not a number"))?;
    if amount < BigDecimal::from(0) {
        return Err(malformed("field `amount` is negative"));
    }
    Ok((number.clone(), amount))
}

/// RFC 3339 first, then a naive ISO-8601 date-time read as UTC.
fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, FraudDetectionError> {
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .map_err(|_| malformed(&format!("`{}` is not an ISO-8601 timestamp", text)))
}
