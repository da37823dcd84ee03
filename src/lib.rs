pub mod analytics;
pub mod boulevard;
pub mod cache;
pub mod config;
pub mod reporting;

pub use analytics::aggregate::{aggregate, ProfitSummary};
pub use analytics::cost::{CostCatalog, CostConfig, InventoryCostEntry};
pub use boulevard::auth::BoulevardAuth;
pub use boulevard::client::{BoulevardClient, RetryConfig};
pub use boulevard::pagination::PageLimits;
pub use boulevard::types::{LineKind, Order, OrdersRequest};
pub use cache::ResponseCache;
pub use config::BlvdConfig;
pub use reporting::ReportingService;
