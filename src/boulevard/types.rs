use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Convert upstream minor-currency units (cents) to a major-unit decimal.
pub fn from_minor_units(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

// ---------------------------------------------------------------------------
// GraphQL envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

/// Raw connection shape: `{edges: [{node}], pageInfo: {hasNextPage, endCursor}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: Option<OrderSummary>,
    #[serde(default)]
    pub line_groups: Vec<LineGroup>,
}

impl Order {
    /// Order subtotal in minor units, when the upstream supplied one.
    pub fn subtotal_minor(&self) -> Option<i64> {
        self.summary.as_ref().and_then(|s| s.current_subtotal)
    }

    pub fn lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.line_groups.iter().flat_map(|g| g.lines.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(default)]
    pub current_subtotal: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineGroup {
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

/// One priced entry on an order. The upstream distinguishes subtypes with a
/// `__typename` tag; each variant carries only the fields that subtype has.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum OrderLine {
    #[serde(rename = "OrderProductLine", rename_all = "camelCase")]
    Product {
        id: String,
        #[serde(default)]
        product_id: Option<String>,
        name: String,
        #[serde(default)]
        quantity: i64,
        #[serde(default)]
        current_subtotal: i64,
        #[serde(default)]
        current_discount_amount: i64,
    },
    #[serde(rename = "OrderServiceLine", rename_all = "camelCase")]
    Service {
        id: String,
        #[serde(default)]
        service_id: Option<String>,
        name: String,
        #[serde(default)]
        quantity: i64,
        #[serde(default)]
        current_subtotal: i64,
        #[serde(default)]
        current_discount_amount: i64,
    },
    #[serde(rename = "OrderGratuityLine", rename_all = "camelCase")]
    Gratuity {
        id: String,
        #[serde(default)]
        quantity: i64,
        #[serde(default)]
        current_subtotal: i64,
        #[serde(default)]
        current_discount_amount: i64,
    },
    #[serde(rename = "OrderAccountCreditLine", rename_all = "camelCase")]
    AccountCredit {
        id: String,
        #[serde(default)]
        quantity: i64,
        #[serde(default)]
        current_subtotal: i64,
        #[serde(default)]
        current_discount_amount: i64,
    },
}

impl OrderLine {
    pub fn kind(&self) -> LineKind {
        match self {
            OrderLine::Product { .. } => LineKind::Product,
            OrderLine::Service { .. } => LineKind::Service,
            OrderLine::Gratuity { .. } => LineKind::Gratuity,
            OrderLine::AccountCredit { .. } => LineKind::AccountCredit,
        }
    }

    /// Display name used for cost lookup and item rollups. Gratuity and
    /// account-credit lines have no name upstream.
    pub fn display_name(&self) -> &str {
        match self {
            OrderLine::Product { name, .. } | OrderLine::Service { name, .. } => name,
            OrderLine::Gratuity { .. } => "Gratuity",
            OrderLine::AccountCredit { .. } => "Account Credit",
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            OrderLine::Product { quantity, .. }
            | OrderLine::Service { quantity, .. }
            | OrderLine::Gratuity { quantity, .. }
            | OrderLine::AccountCredit { quantity, .. } => *quantity,
        }
    }

    pub fn subtotal_minor(&self) -> i64 {
        match self {
            OrderLine::Product {
                current_subtotal, ..
            }
            | OrderLine::Service {
                current_subtotal, ..
            }
            | OrderLine::Gratuity {
                current_subtotal, ..
            }
            | OrderLine::AccountCredit {
                current_subtotal, ..
            } => *current_subtotal,
        }
    }

    pub fn discount_minor(&self) -> i64 {
        match self {
            OrderLine::Product {
                current_discount_amount,
                ..
            }
            | OrderLine::Service {
                current_discount_amount,
                ..
            }
            | OrderLine::Gratuity {
                current_discount_amount,
                ..
            }
            | OrderLine::AccountCredit {
                current_discount_amount,
                ..
            } => *current_discount_amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Product,
    Service,
    Gratuity,
    AccountCredit,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Product => write!(f, "product"),
            LineKind::Service => write!(f, "service"),
            LineKind::Gratuity => write!(f, "gratuity"),
            LineKind::AccountCredit => write!(f, "credit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog records (services / products / locations)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_price: Option<i64>,
}

impl ServiceRecord {
    pub fn default_price_decimal(&self) -> Option<Decimal> {
        self.default_price.map(from_minor_units)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub unit_price: Option<i64>,
}

impl ProductRecord {
    pub fn unit_price_decimal(&self) -> Option<Decimal> {
        self.unit_price.map(from_minor_units)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// ---------------------------------------------------------------------------
// OrdersRequest
// ---------------------------------------------------------------------------

/// Caller-supplied scope for an order fetch: a closed-at date range and an
/// optional location filter.
#[derive(Debug, Clone)]
pub struct OrdersRequest {
    pub location_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl OrdersRequest {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            location_id: None,
            start_date,
            end_date,
        }
    }

    pub fn at_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// Upstream query-string filter covering the whole end day.
    pub fn filter_string(&self) -> String {
        format!(
            "closedAt >= '{}T00:00:00Z' AND closedAt <= '{}T23:59:59Z'",
            self.start_date, self.end_date
        )
    }

    pub fn variables(&self, first: u32, after: Option<&str>) -> Value {
        json!({
            "locationId": self.location_id,
            "query": self.filter_string(),
            "first": first,
            "after": after,
        })
    }
}
