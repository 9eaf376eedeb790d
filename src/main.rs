mod alert_store_client;
mod config;
mod error;
mod handler;
mod notification_client;
mod risk;
mod time_window;
mod transaction;
mod transaction_window_client;
mod window_summary;

use crate::alert_store_client::DynamoDbAlertClient;
use crate::config::Config;
use crate::handler::{FraudHandler, HandlerOutput};
use crate::notification_client::SnsNotificationClient;
use crate::transaction_window_client::DynamoDbTransactionClient;
use chrono::Utc;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use rusoto_dynamodb::DynamoDbClient;
use rusoto_sns::SnsClient;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type Handler = FraudHandler<DynamoDbTransactionClient, DynamoDbAlertClient, SnsNotificationClient>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    info!(
        transactions_table = %config.transactions_table,
        alerts_table = %config.alerts_table,
        region = ?config.region,
        "starting fraud detector"
    );

    let dynamo_db = DynamoDbClient::new(config.region.clone());
    let handler = FraudHandler::new(
        DynamoDbTransactionClient::new_with_client(dynamo_db.clone(), config.transactions_table),
        DynamoDbAlertClient::new_with_client(dynamo_db, config.alerts_table),
        SnsNotificationClient::new_with_client(SnsClient::new(config.region), config.topic_arn),
    );

    run(service_fn(|event: LambdaEvent<Value>| {
        fraud_handler(&handler, event)
    }))
    .await
}

async fn fraud_handler(handler: &Handler, event: LambdaEvent<Value>) -> Result<HandlerOutput, Error> {
    let output = handler
        .handle(&event.payload, Utc::now())
        .await
        .map_err(|error| {
            if error.is_window_query_failure() {
                error!(%error, "recent transactions unavailable");
            } else if error.is_notification_or_persistence_failure() {
                error!(%error, "fraud alert not delivered");
            } else {
                error!(%error, "transaction rejected");
            }
            error
        })?;
    Ok(output)
}
