use crate::transaction::RecentTransaction;
use bigdecimal::BigDecimal;
use std::ops::Add;

#[derive(Debug, PartialEq)]
pub struct WindowSummary {
    pub count: usize,
    pub total: BigDecimal,
}

impl Default for WindowSummary {
    fn default() -> Self {
        Self {
            count: 0,
            total: BigDecimal::from(0),
        }
    }
}

impl WindowSummary {
    pub fn from_transactions(transactions: &[RecentTransaction]) -> Self {
        transactions
            .iter()
            .fold(WindowSummary::default(), |summary, transaction| WindowSummary {
                count: summary.count + 1,
                total: summary.total.add(&transaction.amount),
            })
    }
}
