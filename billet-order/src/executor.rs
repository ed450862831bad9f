use crate::changes::{ChangeError, ChangeOptions, OrderChangeApi, OrderChangeManager};
use crate::models::Order;
use crate::selection::{self, SelectionError};
use crate::settlement::{self, AutoSettlement};
use billet_core::payment::{PaymentError, PaymentGateway};
use billet_core::settings::{SettingsStore, INVOICE_AUTO_GENERATE};
use std::sync::Arc;

/// Outcome of a successful partial cancellation.
///
/// `order` is the post-commit state returned by the change API; the
/// settlement verdict carries the payment when one was made.
#[derive(Debug)]
pub struct CancellationOutcome {
    pub order: Order,
    pub settlement: AutoSettlement,
}

#[derive(Debug, thiserror::Error)]
pub enum CancelError {
    #[error("Please select at least one ticket to cancel.")]
    EmptySelection,

    #[error("{0}")]
    Change(#[from] ChangeError),

    #[error("{0}")]
    Payment(#[from] PaymentError),
}

impl From<SelectionError> for CancelError {
    fn from(_: SelectionError) -> Self {
        Self::EmptySelection
    }
}

/// Runs the partial-cancellation workflow against the injected host
/// capabilities. One instance serves all requests; every call works from the
/// order and settings state it is handed, nothing is cached.
pub struct CancellationService {
    changes: Arc<dyn OrderChangeApi>,
    payments: Arc<dyn PaymentGateway>,
    settings: Arc<dyn SettingsStore>,
}

impl CancellationService {
    pub fn new(
        changes: Arc<dyn OrderChangeApi>,
        payments: Arc<dyn PaymentGateway>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            changes,
            payments,
            settings,
        }
    }

    /// Cancel the selected positions of `order`.
    ///
    /// `raw_selection` is the repeated form field as submitted; malformed and
    /// unknown entries are dropped before anything is mutated. The commit is
    /// a single atomic change transaction with quota re-validation; on
    /// success the order is auto-settled if nothing is left to pay.
    pub async fn cancel_positions(
        &self,
        order: &Order,
        raw_selection: &[String],
    ) -> Result<CancellationOutcome, CancelError> {
        let direct = selection::build_cancel_set(order, raw_selection)?;

        let reissue_invoice = !order.invoices.is_empty()
            || self
                .settings
                .get_bool(&order.event, INVOICE_AUTO_GENERATE)
                .await;

        let mut manager = OrderChangeManager::new(
            self.changes.clone(),
            order.id,
            ChangeOptions {
                notify: true,
                reissue_invoice,
            },
        );
        for position in &direct {
            manager.cancel(*position);
        }

        let updated = manager.commit(true).await?;
        tracing::info!(
            order = %order.code,
            canceled = direct.len(),
            "selected positions canceled"
        );

        let settlement = settlement::ensure_free_payment(&updated, self.payments.as_ref()).await?;

        Ok(CancellationOutcome {
            order: updated,
            settlement,
        })
    }
}
