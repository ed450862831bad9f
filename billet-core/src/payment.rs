use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Created,
    Pending,
    Confirmed,
    Canceled,
    Failed,
}

/// A record of value transferred against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub state: PaymentState,
    pub provider: String,
    pub amount: Decimal,
    pub fee: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        order_id: Uuid,
        state: PaymentState,
        provider: &str,
        amount: Decimal,
        fee: Option<Decimal>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            state,
            provider: provider.to_string(),
            amount,
            fee,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    #[error("There is not enough quota available on quota \"{quota}\" to perform the operation.")]
    QuotaExceeded { quota: String },
}

/// Payment creation/confirmation capability provided by the host.
///
/// Confirmation validates capacity at its own point in time and raises
/// `QuotaExceeded` on conflict; callers decide whether that is fatal.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Record a new payment against an order
    async fn create_payment(
        &self,
        order_id: Uuid,
        state: PaymentState,
        provider: &str,
        amount: Decimal,
        fee: Option<Decimal>,
    ) -> Result<Payment, PaymentError>;

    /// Confirm a previously created payment
    async fn confirm_payment(
        &self,
        order_id: Uuid,
        payment_id: Uuid,
        send_mail: bool,
        count_waitinglist: bool,
    ) -> Result<Payment, PaymentError>;
}
