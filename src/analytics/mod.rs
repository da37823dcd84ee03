pub mod aggregate;
pub mod category;
pub mod cost;
pub mod similarity;

pub use aggregate::{aggregate, DailyMetric, DiscountImpact, ItemProfitability, ProfitSummary};
pub use category::{sales_by_category, CategoryMap, CategorySales};
pub use cost::{CostCatalog, CostConfig, InventoryCostEntry};
