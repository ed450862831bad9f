pub mod changes;
pub mod eligibility;
pub mod executor;
pub mod memory;
pub mod models;
pub mod quota;
pub mod selection;
pub mod settlement;

pub use changes::{ChangeError, ChangeOperation, ChangeOptions, OrderChangeApi, OrderChangeManager};
pub use executor::{CancelError, CancellationOutcome, CancellationService};
pub use memory::MemoryOrderService;
pub use models::{Invoice, Order, OrderStatus, Position};
pub use settlement::AutoSettlement;
