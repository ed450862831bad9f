pub mod payment;
pub mod settings;

pub use payment::{Payment, PaymentError, PaymentGateway, PaymentState};
pub use settings::{MemorySettingsStore, SettingsStore};
