//! Placeholder checkout used by the pricing pages.
//!
//! There is no gateway behind this: `pay` waits a fixed delay and always
//! succeeds. Do not build on it as if it were a payment integration.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub reference: Uuid,
    pub amount: f64,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SimulatedPayment {
    delay: Duration,
}

impl SimulatedPayment {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn pay(&self, amount: f64) -> Result<PaymentReceipt, ClientError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ClientError::Validation(
                "Payment amount must be greater than zero".to_string(),
            ));
        }
        tokio::time::sleep(self.delay).await;

        let receipt = PaymentReceipt {
            reference: Uuid::new_v4(),
            amount,
            paid_at: Utc::now(),
        };
        info!("Simulated payment {} for {amount}", receipt.reference);
        Ok(receipt)
    }
}
