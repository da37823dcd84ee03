pub mod auth;
pub mod client;
pub mod pagination;
pub mod queries;
pub mod types;

pub use auth::{AuthError, BoulevardAuth};
pub use client::{BoulevardClient, ClientError, RetryConfig};
pub use pagination::{collect_all, Page, PageLimits};
pub use types::{LineKind, Location, Order, OrderLine, OrdersRequest, ProductRecord, ServiceRecord};
