use billet_core::settings::SettingsStore;
use billet_order::{CancellationService, MemoryOrderService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<MemoryOrderService>,
    pub settings: Arc<dyn SettingsStore>,
    pub cancellation: Arc<CancellationService>,
    /// Base URL of the host shop frontend; redirect targets are built on it.
    pub shop_base_url: String,
}
