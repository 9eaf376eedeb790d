use anyhow::{Context, Result};
use rusoto_core::Region;
use std::env;

#[derive(Debug, PartialEq)]
pub struct Config {
    pub transactions_table: String,
    pub alerts_table: String,
    pub topic_arn: String,
    pub region: Region,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), Region::default())
    }

    /// `ALERTS_TABLE` falls back to the transaction table, which is where the
    /// alerts have always been written.
    fn from_lookup<F>(lookup: F, region: Region) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transactions_table = lookup("DYNAMODB_TABLE")
            .filter(|value| !value.is_empty())
            .context("DYNAMODB_TABLE is not set")?;
        let topic_arn = lookup("SNS_TOPIC_ARN")
            .filter(|value| !value.is_empty())
            .context("SNS_TOPIC_ARN is not set")?;
        let alerts_table = lookup("ALERTS_TABLE")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| transactions_table.clone());
        Ok(Config {
            transactions_table,
            alerts_table,
            topic_arn,
            region,
        })
    }
}
