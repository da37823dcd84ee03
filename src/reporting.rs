//! Facade wiring the client, memoization, and aggregation together:
//! date range + optional location in, profitability aggregates out.

use std::sync::Arc;
use std::time::Duration;

use crate::analytics::aggregate::{aggregate, ProfitSummary};
use crate::analytics::category::{sales_by_category, CategoryMap, CategorySales};
use crate::analytics::cost::CostCatalog;
use crate::boulevard::client::{BoulevardClient, ClientError};
use crate::boulevard::pagination::PageLimits;
use crate::boulevard::types::{Order, OrdersRequest};
use crate::cache::{canonical_key, ResponseCache};
use crate::config::BlvdConfig;

const ORDERS_KEY_PREFIX: &str = "orders";

pub struct ReportingService {
    client: BoulevardClient,
    cache: ResponseCache<Arc<Vec<Order>>>,
    catalog: CostCatalog,
    page_size: u32,
    limits: PageLimits,
}

impl ReportingService {
    pub fn new(client: BoulevardClient, catalog: CostCatalog) -> Self {
        Self {
            client,
            cache: ResponseCache::new(Duration::from_secs(300)),
            catalog,
            page_size: 100,
            limits: PageLimits::default(),
        }
    }

    pub fn from_config(config: &BlvdConfig, catalog: CostCatalog) -> Self {
        let cache = if config.cache_enabled {
            ResponseCache::new(config.cache_ttl)
        } else {
            ResponseCache::disabled()
        };
        Self {
            client: BoulevardClient::from_config(config),
            cache,
            catalog,
            page_size: config.page_size,
            limits: PageLimits::new(config.max_pages, config.max_nodes),
        }
    }

    pub fn with_cache(mut self, cache: ResponseCache<Arc<Vec<Order>>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn catalog(&self) -> &CostCatalog {
        &self.catalog
    }

    fn orders_key(request: &OrdersRequest) -> String {
        canonical_key(
            ORDERS_KEY_PREFIX,
            &[
                (
                    "location",
                    request
                        .location_id
                        .clone()
                        .unwrap_or_else(|| "all".to_string()),
                ),
                ("start", request.start_date.to_string()),
                ("end", request.end_date.to_string()),
            ],
        )
    }

    /// Fetch the full order set for a request, memoized within the cache's
    /// retention window.
    pub async fn orders(&self, request: &OrdersRequest) -> Result<Arc<Vec<Order>>, ClientError> {
        let key = Self::orders_key(request);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, orders = hit.len(), "Order fetch served from cache");
            return Ok(hit);
        }

        let fetched = self
            .client
            .fetch_orders(request, self.page_size, &self.limits)
            .await?;
        tracing::info!(
            orders = fetched.len(),
            start = %request.start_date,
            end = %request.end_date,
            "Fetched order set from upstream"
        );

        let fetched = Arc::new(fetched);
        self.cache.insert(key, fetched.clone());
        Ok(fetched)
    }

    pub async fn profit_summary(
        &self,
        request: &OrdersRequest,
    ) -> Result<ProfitSummary, ClientError> {
        let orders = self.orders(request).await?;
        Ok(aggregate(&orders, &self.catalog))
    }

    pub async fn category_sales(
        &self,
        request: &OrdersRequest,
        map: &CategoryMap,
    ) -> Result<Vec<CategorySales>, ClientError> {
        let orders = self.orders(request).await?;
        Ok(sales_by_category(&orders, map))
    }

    /// Drop memoized order fetches. Whatever mutates upstream data is
    /// responsible for calling this; entries otherwise live out the
    /// retention window.
    pub fn refresh(&self) {
        self.cache.flush_prefix(ORDERS_KEY_PREFIX);
    }
}
