use crate::error::FraudDetectionError;
use async_trait::async_trait;

use rusoto_sns::{PublishInput, Sns, SnsClient};

pub const FRAUD_ALERT_SUBJECT: &str = "Potential Fraud Detection";

pub struct SnsNotificationClient {
    client: SnsClient,
    topic_arn: String,
}

#[async_trait]
pub trait Notify {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), FraudDetectionError>;
}

#[async_trait]
impl Notify for SnsNotificationClient {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), FraudDetectionError> {
        self.client
            .publish(PublishInput {
                topic_arn: Some(self.topic_arn.clone()),
                subject: Some(subject.to_string()),
                message: message.to_string(),
                ..Default::default()
            })
            .await?;
        Ok(())
    }
}

impl SnsNotificationClient {
    pub fn new_with_client(client: SnsClient, topic_arn: String) -> Self {
        SnsNotificationClient { client, topic_arn }
    }
}
