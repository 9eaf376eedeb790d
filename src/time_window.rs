use crate::error::FraudDetectionError;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::convert::TryFrom;

pub const WINDOW_HOURS: i64 = 24;

/// The trailing window a user's recent transactions are looked up in.
#[derive(Debug, PartialEq)]
pub struct TimeWindow {
    pub since: DateTime<Utc>,
}

impl TryFrom<DateTime<Utc>> for TimeWindow {
    type Error = FraudDetectionError;

    fn try_from(now: DateTime<Utc>) -> Result<Self, Self::Error> {
        let since = now
            .checked_sub_signed(Duration::hours(WINDOW_HOURS))
            .ok_or(FraudDetectionError::OutOfRangeTime)?;
        Ok(TimeWindow { since })
    }
}

impl TimeWindow {
    /// Range key value compared against the stored `transaction_time` strings.
    pub fn since_key(&self) -> String {
        self.since.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}
