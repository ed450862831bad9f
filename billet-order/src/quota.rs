use std::collections::HashMap;

/// Capacity tracking for one item, consulted before overselling.
#[derive(Debug, Clone)]
pub struct Quota {
    pub item: String,
    /// `None` means unlimited.
    pub size: Option<u32>,
    pub used: u32,
}

/// Per-item capacity book for the in-memory host.
#[derive(Debug, Clone, Default)]
pub struct QuotaBook {
    quotas: HashMap<String, Quota>,
}

impl QuotaBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register capacity for an item. Items without a registered quota are
    /// unconstrained.
    pub fn set_capacity(&mut self, item: &str, size: Option<u32>) {
        self.quotas.insert(
            item.to_string(),
            Quota {
                item: item.to_string(),
                size,
                used: 0,
            },
        );
    }

    pub fn get(&self, item: &str) -> Option<&Quota> {
        self.quotas.get(item)
    }

    /// Whether one more unit of the item fits.
    pub fn available(&self, item: &str) -> bool {
        match self.quotas.get(item) {
            Some(quota) => match quota.size {
                Some(size) => quota.used < size,
                None => true,
            },
            None => true,
        }
    }

    pub fn consume(&mut self, item: &str) -> Result<(), QuotaError> {
        if !self.available(item) {
            return Err(QuotaError::Exceeded {
                quota: item.to_string(),
            });
        }
        if let Some(quota) = self.quotas.get_mut(item) {
            quota.used += 1;
        }
        Ok(())
    }

    pub fn release(&mut self, item: &str) {
        if let Some(quota) = self.quotas.get_mut(item) {
            quota.used = quota.used.saturating_sub(1);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("There is not enough quota available on quota \"{quota}\" to perform the operation.")]
    Exceeded { quota: String },
}
