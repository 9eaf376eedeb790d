use std::error::Error;

use rusoto_core::RusotoError;
use rusoto_dynamodb::{PutItemError, QueryError};
use rusoto_sns::PublishError;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, PartialEq)]
pub enum FraudDetectionError {
    MalformedInput(String),
    MalformedWindowItem(String),
    OutOfRangeTime,
    SerializeError(String),
    QueryTransactionsError(RusotoError<QueryError>),
    PutAlertError(RusotoError<PutItemError>),
    PublishAlertError(RusotoError<PublishError>),
}

impl Display for FraudDetectionError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            FraudDetectionError::MalformedInput(ref reason) => {
                write!(f, "Malformed transaction: {}", reason)
            }
            FraudDetectionError::MalformedWindowItem(ref reason) => {
                write!(f, "Malformed recent transaction: {}", reason)
            }
            FraudDetectionError::OutOfRangeTime => write!(f, "Time window is out of range"),
            FraudDetectionError::SerializeError(ref reason) => {
                write!(f, "Failed to serialize: {}", reason)
            }
            FraudDetectionError::QueryTransactionsError(ref error) => {
                std::fmt::Display::fmt(error, f)
            }
            FraudDetectionError::PutAlertError(ref error) => std::fmt::Display::fmt(error, f),
            FraudDetectionError::PublishAlertError(ref error) => std::fmt::Display::fmt(error, f),
        }
    }
}

impl Error for FraudDetectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            FraudDetectionError::QueryTransactionsError(ref error) => Some(error),
            FraudDetectionError::PutAlertError(ref error) => Some(error),
            FraudDetectionError::PublishAlertError(ref error) => Some(error),
            _ => None,
        }
    }
}

impl FraudDetectionError {
    /// True for failures of the window lookup. The evaluator never runs on a
    /// window it could not read.
    pub fn is_window_query_failure(&self) -> bool {
        matches!(
            self,
            FraudDetectionError::QueryTransactionsError(_)
                | FraudDetectionError::MalformedWindowItem(_)
        )
    }

    /// True for failures after a review decision was already made.
    pub fn is_notification_or_persistence_failure(&self) -> bool {
        matches!(
            self,
            FraudDetectionError::PutAlertError(_) | FraudDetectionError::PublishAlertError(_)
        )
    }
}

impl From<RusotoError<QueryError>> for FraudDetectionError {
    fn from(e: RusotoError<QueryError>) -> FraudDetectionError {
        FraudDetectionError::QueryTransactionsError(e)
    }
}

impl From<RusotoError<PutItemError>> for FraudDetectionError {
    fn from(e: RusotoError<PutItemError>) -> FraudDetectionError {
        FraudDetectionError::PutAlertError(e)
    }
}

impl From<RusotoError<PublishError>> for FraudDetectionError {
    fn from(e: RusotoError<PublishError>) -> FraudDetectionError {
        FraudDetectionError::PublishAlertError(e)
    }
}

impl From<serde_json::Error> for FraudDetectionError {
    fn from(e: serde_json::Error) -> FraudDetectionError {
        FraudDetectionError::SerializeError(e.to_string())
    }
}
