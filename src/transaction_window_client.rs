use crate::error::FraudDetectionError;
use crate::time_window::TimeWindow;
use crate::transaction::RecentTransaction;
use async_trait::async_trait;

use rusoto_dynamodb::{AttributeValue, DynamoDb, DynamoDbClient, QueryInput};
use std::collections::HashMap;
use std::convert::TryFrom;
use tracing::debug;

const KEY_CONDITION: &str = "user_id = :uid AND transaction_time > :since";

pub struct DynamoDbTransactionClient {
    client: DynamoDbClient,
    table_name: String,
}

#[async_trait]
pub trait QueryRecent {
    /// Every stored transaction of `user_id` after `window.since`, in no particular order.
    async fn query_recent(
        &self,
        user_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RecentTransaction>, FraudDetectionError>;
}

#[async_trait]
impl QueryRecent for DynamoDbTransactionClient {
    async fn query_recent(
        &self,
        user_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RecentTransaction>, FraudDetectionError> {
        let mut values = HashMap::new();
        values.insert(":uid".to_string(), string_value(user_id));
        values.insert(":since".to_string(), string_value(&window.since_key()));

        let mut transactions = Vec::<RecentTransaction>::new();
        let mut exclusive_start_key = None;
        loop {
            let output = self
                .client
                .query(QueryInput {
                    table_name: self.table_name.clone(),
                    key_condition_expression: Some(KEY_CONDITION.to_string()),
                    expression_attribute_values: Some(values.clone()),
                    exclusive_start_key,
                    ..Default::default()
                })
                .await?;
            for item in output.items.unwrap_or_default() {
                transactions.push(RecentTransaction::try_from(item)?);
            }
            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }
        debug!(
            user_id,
            since = %window.since_key(),
            count = transactions.len(),
            "queried recent transactions"
        );
        Ok(transactions)
    }
}

impl DynamoDbTransactionClient {
    pub fn new_with_client(client: DynamoDbClient, table_name: String) -> Self {
        DynamoDbTransactionClient { client, table_name }
    }
}

fn string_value(value: &str) -> AttributeValue {
    AttributeValue {
        s: Some(value.to_string()),
        ..Default::default()
    }
}
