use crate::models::{Order, OrderStatus};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// A queued modification to an order, applied only at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOperation {
    /// Cancel one position; the host cascades to its non-canceled add-ons.
    CancelPosition { position: u64 },
}

/// Commit-wide flags for a change transaction.
#[derive(Debug, Clone, Copy)]
pub struct ChangeOptions {
    /// Notify the buyer once the change is applied.
    pub notify: bool,
    /// Re-issue the order's invoice as part of the commit.
    pub reissue_invoice: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("In its current status ({0:?}), this order cannot be changed.")]
    NotModifiable(OrderStatus),

    #[error("Position {0} does not exist on this order or was already canceled.")]
    PositionNotFound(u64),

    #[error("There is not enough quota available on quota \"{quota}\" to perform the operation.")]
    QuotaExceeded { quota: String },
}

/// Atomic order-change capability provided by the host.
///
/// A commit either applies every queued operation and returns the updated
/// order, or applies nothing and returns the validation error. Serializing
/// concurrent modifications to the same order is the implementor's job.
#[async_trait]
pub trait OrderChangeApi: Send + Sync {
    async fn commit(
        &self,
        order_id: Uuid,
        operations: &[ChangeOperation],
        options: ChangeOptions,
        check_quotas: bool,
    ) -> Result<Order, ChangeError>;
}

/// Queues operations against one order and commits them in a single call.
pub struct OrderChangeManager {
    api: Arc<dyn OrderChangeApi>,
    order_id: Uuid,
    options: ChangeOptions,
    operations: Vec<ChangeOperation>,
}

impl OrderChangeManager {
    pub fn new(api: Arc<dyn OrderChangeApi>, order_id: Uuid, options: ChangeOptions) -> Self {
        Self {
            api,
            order_id,
            options,
            operations: Vec::new(),
        }
    }

    /// Queue a cancel for one position.
    pub fn cancel(&mut self, position: u64) {
        self.operations
            .push(ChangeOperation::CancelPosition { position });
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Commit all queued operations atomically. No retries on failure.
    pub async fn commit(self, check_quotas: bool) -> Result<Order, ChangeError> {
        self.api
            .commit(self.order_id, &self.operations, self.options, check_quotas)
            .await
    }
}
