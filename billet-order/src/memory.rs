use crate::changes::{ChangeError, ChangeOperation, ChangeOptions, OrderChangeApi};
use crate::models::{Invoice, Order, OrderStatus};
use crate::quota::{QuotaBook, QuotaError};
use async_trait::async_trait;
use billet_core::payment::{Payment, PaymentError, PaymentGateway, PaymentState};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory stand-in for the host order subsystem: an order directory and a
/// quota book behind one lock, with the change and payment capabilities
/// implemented against them. The write guard is the transaction boundary.
pub struct MemoryOrderService {
    inner: RwLock<Inner>,
}

struct Inner {
    orders: HashMap<Uuid, Order>,
    quotas: QuotaBook,
}

impl MemoryOrderService {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                orders: HashMap::new(),
                quotas: QuotaBook::new(),
            }),
        }
    }

    /// Register an order handed off by the host.
    pub async fn insert_order(&self, order: Order) {
        let mut inner = self.inner.write().await;
        inner.orders.insert(order.id, order);
    }

    pub async fn get_order(&self, id: Uuid) -> Option<Order> {
        self.inner.read().await.orders.get(&id).cloned()
    }

    /// Register capacity for an item. `None` means unlimited.
    pub async fn set_quota(&self, item: &str, size: Option<u32>) {
        let mut inner = self.inner.write().await;
        inner.quotas.set_capacity(item, size);
    }

    pub async fn quota_used(&self, item: &str) -> u32 {
        self.inner
            .read()
            .await
            .quotas
            .get(item)
            .map(|quota| quota.used)
            .unwrap_or(0)
    }
}

impl Default for MemoryOrderService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_modifiable(status: OrderStatus) -> bool {
    matches!(
        status,
        OrderStatus::Pending | OrderStatus::Expired | OrderStatus::Paid
    )
}

#[async_trait]
impl OrderChangeApi for MemoryOrderService {
    async fn commit(
        &self,
        order_id: Uuid,
        operations: &[ChangeOperation],
        options: ChangeOptions,
        check_quotas: bool,
    ) -> Result<Order, ChangeError> {
        let mut inner = self.inner.write().await;
        let current = inner
            .orders
            .get(&order_id)
            .ok_or(ChangeError::OrderNotFound(order_id))?;
        if !is_modifiable(current.status) {
            return Err(ChangeError::NotModifiable(current.status));
        }

        // apply to scratch copies; a failed commit must leave no trace
        let mut order = current.clone();
        let mut quotas = inner.quotas.clone();
        let holds_quota = order.status == OrderStatus::Paid;

        tracing::debug!(
            order = %order.code,
            operations = operations.len(),
            check_quotas,
            "committing order change"
        );

        for operation in operations {
            match operation {
                ChangeOperation::CancelPosition { position } => {
                    if !order
                        .positions
                        .iter()
                        .any(|p| p.id == *position && !p.canceled)
                    {
                        return Err(ChangeError::PositionNotFound(*position));
                    }
                    let mut canceled = vec![*position];
                    canceled.extend(order.addons_of(*position).map(|addon| addon.id));
                    for p in order.positions.iter_mut() {
                        if canceled.contains(&p.id) {
                            p.canceled = true;
                            if holds_quota {
                                quotas.release(&p.item);
                            }
                        }
                    }
                }
            }
        }
        // cancel operations only release capacity; `check_quotas` is where
        // additive operation kinds would validate their demand against the book

        order.total = order.live_total();
        order.updated_at = Utc::now();

        if options.reissue_invoice && !order.invoices.is_empty() {
            let number = format!("{}-{}", order.code, order.invoices.len() + 1);
            order.invoices.push(Invoice {
                number,
                created_at: Utc::now(),
            });
            tracing::debug!(order = %order.code, "invoice reissued");
        }

        if options.notify {
            tracing::info!(order = %order.code, "order changed, notifying buyer");
        }

        inner.quotas = quotas;
        inner.orders.insert(order_id, order.clone());
        Ok(order)
    }
}

#[async_trait]
impl PaymentGateway for MemoryOrderService {
    async fn create_payment(
        &self,
        order_id: Uuid,
        state: PaymentState,
        provider: &str,
        amount: Decimal,
        fee: Option<Decimal>,
    ) -> Result<Payment, PaymentError> {
        let mut inner = self.inner.write().await;
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(PaymentError::OrderNotFound(order_id))?;
        let payment = Payment::new(order_id, state, provider, amount, fee);
        order.payments.push(payment.clone());
        order.updated_at = Utc::now();
        Ok(payment)
    }

    async fn confirm_payment(
        &self,
        order_id: Uuid,
        payment_id: Uuid,
        send_mail: bool,
        count_waitinglist: bool,
    ) -> Result<Payment, PaymentError> {
        let mut inner = self.inner.write().await;
        let Inner { orders, quotas } = &mut *inner;
        let order = orders
            .get_mut(&order_id)
            .ok_or(PaymentError::OrderNotFound(order_id))?;
        let idx = order
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;

        // a pending order holds no quota until it is paid; validate and
        // consume in one pass so the book stays untouched on conflict
        let mut book = quotas.clone();
        for position in order.positions.iter().filter(|p| !p.canceled) {
            book.consume(&position.item)
                .map_err(|QuotaError::Exceeded { quota }| PaymentError::QuotaExceeded { quota })?;
        }
        *quotas = book;

        order.payments[idx].state = PaymentState::Confirmed;
        order.status = OrderStatus::Paid;
        order.updated_at = Utc::now();
        if send_mail {
            tracing::info!(order = %order.code, "sending payment confirmation mail");
        }
        tracing::info!(
            order = %order.code,
            count_waitinglist,
            "payment confirmed, order marked as paid"
        );
        Ok(order.payments[idx].clone())
    }
}
