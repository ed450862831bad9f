use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Settings key: partial cancellation is enabled for the event.
pub const PARTIAL_CANCELLATION_ENABLED: &str = "partial_cancellation_enabled";

/// Settings key: invoices are generated automatically for the event.
pub const INVOICE_AUTO_GENERATE: &str = "invoice_auto_generate";

/// Per-event boolean settings lookup, persisted by the host.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a flag for an event. Unset flags read as `false`.
    async fn get_bool(&self, event: &str, key: &str) -> bool;

    async fn set_bool(&self, event: &str, key: &str, value: bool);
}

/// In-memory settings store
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<(String, String), bool>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_bool(&self, event: &str, key: &str) -> bool {
        self.values
            .read()
            .map(|values| {
                values
                    .get(&(event.to_string(), key.to_string()))
                    .copied()
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    async fn set_bool(&self, event: &str, key: &str, value: bool) {
        if let Ok(mut values) = self.values.write() {
            tracing::debug!(event, key, value, "updating event setting");
            values.insert((event.to_string(), key.to_string()), value);
        }
    }
}
