use crate::models::Order;
use billet_core::settings::{SettingsStore, PARTIAL_CANCELLATION_ENABLED};
use rust_decimal::Decimal;

/// Whether the buyer may cancel a subset of this order's positions.
///
/// All four conditions must hold: host policy allows user cancellation, the
/// order has more than one live position, the feature is switched on for the
/// event, and the order total is exactly zero.
pub fn partial_cancel_allowed(order: &Order, feature_enabled: bool) -> bool {
    order.cancel_allowed
        && order.count_positions() > 1
        && feature_enabled
        && order.total == Decimal::ZERO
}

/// Evaluate the gate against the event's stored settings.
///
/// Re-run on every request; the verdict is never cached.
pub async fn check(order: &Order, settings: &dyn SettingsStore) -> bool {
    let enabled = settings
        .get_bool(&order.event, PARTIAL_CANCELLATION_ENABLED)
        .await;
    partial_cancel_allowed(order, enabled)
}
