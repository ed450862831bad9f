use crate::models::{Order, OrderStatus};
use billet_core::payment::{Payment, PaymentError, PaymentGateway, PaymentState};
use rust_decimal::Decimal;

/// Result of the zero-due auto-settlement step.
#[derive(Debug, Clone)]
pub enum AutoSettlement {
    /// Nothing to do: the order still owes money, needs approval, is not in
    /// a settleable status, or is already settled.
    NotRequired,
    /// A zero-amount payment was created and confirmed.
    Settled(Payment),
    /// The payment could not be confirmed because capacity ran out; the
    /// preceding cancellation stays committed.
    CapacityConflict,
}

fn settlement_due(order: &Order) -> bool {
    if order.total != Decimal::ZERO || order.require_approval {
        return false;
    }
    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Expired) {
        return false;
    }
    !order.has_confirmed_payment()
}

/// Create and confirm a zero-amount `"free"` payment for an order that has
/// nothing left to pay.
///
/// A quota conflict on confirmation is reported, not propagated: the change
/// commit that led here must stand. No notification mail is sent and the
/// order is not counted against any waiting list.
pub async fn ensure_free_payment(
    order: &Order,
    gateway: &dyn PaymentGateway,
) -> Result<AutoSettlement, PaymentError> {
    if !settlement_due(order) {
        return Ok(AutoSettlement::NotRequired);
    }

    let payment = gateway
        .create_payment(order.id, PaymentState::Created, "free", Decimal::ZERO, None)
        .await?;

    match gateway.confirm_payment(order.id, payment.id, false, false).await {
        Ok(confirmed) => Ok(AutoSettlement::Settled(confirmed)),
        Err(PaymentError::QuotaExceeded { quota }) => {
            tracing::warn!(
                order = %order.code,
                quota = %quota,
                "tickets canceled but the order could not be marked as paid"
            );
            Ok(AutoSettlement::CapacityConflict)
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryOrderService;

    fn free_order() -> Order {
        let mut order = Order::new("democon", "AB1CD", "z9x8c7");
        order.add_position("Standard ticket", Decimal::ZERO, None);
        order.add_position("Standard ticket", Decimal::ZERO, None);
        order
    }

    #[tokio::test]
    async fn test_settles_pending_zero_total_order() {
        let service = MemoryOrderService::new();
        let order = free_order();
        let order_id = order.id;
        service.insert_order(order.clone()).await;

        let settlement = ensure_free_payment(&order, &service).await.unwrap();
        let payment = match settlement {
            AutoSettlement::Settled(payment) => payment,
            other => panic!("expected settlement, got {:?}", other),
        };
        assert_eq!(payment.provider, "free");
        assert_eq!(payment.amount, Decimal::ZERO);
        assert_eq!(payment.fee, None);
        assert_eq!(payment.state, PaymentState::Confirmed);

        let stored = service.get_order(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
        assert_eq!(stored.payments.len(), 1);
    }

    #[tokio::test]
    async fn test_skips_orders_that_still_owe_money() {
        let service = MemoryOrderService::new();
        let mut order = free_order();
        order.add_position("Supporter ticket", Decimal::new(4900, 2), None);
        service.insert_order(order.clone()).await;

        let settlement = ensure_free_payment(&order, &service).await.unwrap();
        assert!(matches!(settlement, AutoSettlement::NotRequired));
        assert!(service.get_order(order.id).await.unwrap().payments.is_empty());
    }

    #[tokio::test]
    async fn test_skips_orders_requiring_approval() {
        let service = MemoryOrderService::new();
        let mut order = free_order();
        order.require_approval = true;
        service.insert_order(order.clone()).await;

        let settlement = ensure_free_payment(&order, &service).await.unwrap();
        assert!(matches!(settlement, AutoSettlement::NotRequired));
    }

    #[tokio::test]
    async fn test_skips_paid_and_canceled_orders() {
        let service = MemoryOrderService::new();
        for status in [OrderStatus::Paid, OrderStatus::Canceled] {
            let mut order = free_order();
            order.status = status;
            service.insert_order(order.clone()).await;
            let settlement = ensure_free_payment(&order, &service).await.unwrap();
            assert!(matches!(settlement, AutoSettlement::NotRequired));
        }
    }

    #[tokio::test]
    async fn test_expired_orders_are_settleable() {
        let service = MemoryOrderService::new();
        let mut order = free_order();
        order.status = OrderStatus::Expired;
        service.insert_order(order.clone()).await;

        let settlement = ensure_free_payment(&order, &service).await.unwrap();
        assert!(matches!(settlement, AutoSettlement::Settled(_)));
    }

    #[tokio::test]
    async fn test_skips_orders_with_confirmed_payment() {
        let service = MemoryOrderService::new();
        let mut order = free_order();
        order.payments.push(Payment::new(
            order.id,
            PaymentState::Confirmed,
            "banktransfer",
            Decimal::ZERO,
            None,
        ));
        service.insert_order(order.clone()).await;

        let settlement = ensure_free_payment(&order, &service).await.unwrap();
        assert!(matches!(settlement, AutoSettlement::NotRequired));
        assert_eq!(service.get_order(order.id).await.unwrap().payments.len(), 1);
    }

    #[tokio::test]
    async fn test_capacity_conflict_is_not_fatal() {
        let service = MemoryOrderService::new();
        let order = free_order();
        let order_id = order.id;
        service.insert_order(order.clone()).await;
        service.set_quota("Standard ticket", Some(1)).await;

        let settlement = ensure_free_payment(&order, &service).await.unwrap();
        assert!(matches!(settlement, AutoSettlement::CapacityConflict));

        // the payment record stays in created state and the order unpaid
        let stored = service.get_order(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.payments.len(), 1);
        assert_eq!(stored.payments[0].state, PaymentState::Created);
    }
}
