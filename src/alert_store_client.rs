use crate::error::FraudDetectionError;
use crate::risk::AlertRecord;
use async_trait::async_trait;

use chrono::SecondsFormat;
use rusoto_dynamodb::{AttributeValue, DynamoDb, DynamoDbClient, PutItemInput};
use std::collections::HashMap;

pub struct DynamoDbAlertClient {
    client: DynamoDbClient,
    table_name: String,
}

#[async_trait]
pub trait PutAlert {
    async fn put_alert(&self, alert: &AlertRecord) -> Result<(), FraudDetectionError>;
}

#[async_trait]
impl PutAlert for DynamoDbAlertClient {
    async fn put_alert(&self, alert: &AlertRecord) -> Result<(), FraudDetectionError> {
        self.client
            .put_item(PutItemInput {
                table_name: self.table_name.clone(),
                item: alert_item(alert),
                ..Default::default()
            })
            .await?;
        Ok(())
    }
}

impl DynamoDbAlertClient {
    pub fn new_with_client(client: DynamoDbClient, table_name: String) -> Self {
        DynamoDbAlertClient { client, table_name }
    }
}

/// Keyed by `user_id` and `transaction_id`, so a redelivered event overwrites
/// its own alert instead of adding a second one.
fn alert_item(alert: &AlertRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert("user_id".to_string(), string_value(&alert.user_id));
    item.insert(
        "transaction_id".to_string(),
        string_value(&alert.transaction_id),
    );
    item.insert(
        "alert_type".to_string(),
        string_value(alert.alert_type.as_str()),
    );
    item.insert(
        "risk_factors".to_string(),
        AttributeValue {
            ss: Some(
                alert
                    .risk_factors
                    .iter()
                    .map(|flag| flag.as_str().to_string())
                    .collect(),
            ),
            ..Default::default()
        },
    );
    item.insert(
        "timestamp".to_string(),
        string_value(&alert.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    );
    item.insert("status".to_string(), string_value(alert.status.as_str()));
    item
}

fn string_value(value: &str) -> AttributeValue {
    AttributeValue {
        s: Some(value.to_string()),
        ..Default::default()
    }
}
