use billet_core::payment::{Payment, PaymentState};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Expired,
    Canceled,
}

/// The single source of truth for a buyer's purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub code: String,
    pub event: String,
    pub secret: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub require_approval: bool,
    /// Host cancellation policy verdict for this order, precomputed.
    pub cancel_allowed: bool,
    pub positions: Vec<Position>,
    pub payments: Vec<Payment>,
    pub invoices: Vec<Invoice>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(event: &str, code: &str, secret: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code: code.to_string(),
            event: event.to_string(),
            secret: secret.to_string(),
            status: OrderStatus::Pending,
            total: Decimal::ZERO,
            require_approval: false,
            cancel_allowed: true,
            positions: Vec::new(),
            payments: Vec::new(),
            invoices: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a position and keep the total in sync. Returns the new id.
    pub fn add_position(&mut self, item: &str, price: Decimal, addon_to: Option<u64>) -> u64 {
        let id = self.positions.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        self.positions.push(Position {
            id,
            item: item.to_string(),
            price,
            addon_to,
            canceled: false,
        });
        self.total = self.live_total();
        self.updated_at = Utc::now();
        id
    }

    /// Number of positions that have not been canceled
    pub fn count_positions(&self) -> usize {
        self.positions.iter().filter(|p| !p.canceled).count()
    }

    /// Positions that have not been canceled, in position order
    pub fn live_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| !p.canceled)
    }

    pub fn position(&self, id: u64) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    /// Non-canceled add-ons attached to the given position
    pub fn addons_of(&self, id: u64) -> impl Iterator<Item = &Position> {
        self.positions
            .iter()
            .filter(move |p| p.addon_to == Some(id) && !p.canceled)
    }

    /// Sum of non-canceled position prices
    pub fn live_total(&self) -> Decimal {
        self.live_positions().map(|p| p.price).sum()
    }

    pub fn has_confirmed_payment(&self) -> bool {
        self.payments.iter().any(|p| p.state == PaymentState::Confirmed)
    }
}

/// One line item (ticket) within an order; may be an add-on of another
/// position via `addon_to`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: u64,
    pub item: String,
    pub price: Decimal,
    pub addon_to: Option<u64>,
    pub canceled: bool,
}

impl Position {
    pub fn is_addon(&self) -> bool {
        self.addon_to.is_some()
    }
}

/// Invoice reference; only its existence matters to the change workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    pub created_at: DateTime<Utc>,
}
