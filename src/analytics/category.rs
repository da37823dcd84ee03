//! Category rollups over a supplied name→category table with a keyword
//! fallback for unmapped names.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::boulevard::types::{from_minor_units, LineKind, Order};

/// Supplied display-name → category table. Names missing from the table are
/// classified by keyword, defaulting to retail.
pub struct CategoryMap {
    explicit: HashMap<String, String>,
}

impl CategoryMap {
    pub fn new(table: HashMap<String, String>) -> Self {
        Self { explicit: table }
    }

    pub fn empty() -> Self {
        Self {
            explicit: HashMap::new(),
        }
    }

    pub fn category_for(&self, name: &str) -> String {
        if let Some(category) = self.explicit.get(name) {
            return category.clone();
        }
        keyword_category(name).to_string()
    }
}

fn keyword_category(name: &str) -> &'static str {
    let name = name.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

    if matches(&["botox", "dysport", "tox"]) {
        "tox"
    } else if matches(&["filler", "juvederm", "voluma", "vollure"]) {
        "filler"
    } else if matches(&["facial", "hydrafacial"]) {
        "facials"
    } else if matches(&["laser", "hair removal"]) {
        "lasers"
    } else if matches(&["weight", "semaglutide", "tirzepatide"]) {
        "weight_loss"
    } else {
        "retail"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub name: String,
    pub value: Decimal,
}

/// Sum product and service line subtotals per category, sorted by category
/// name. Gratuity and account-credit lines carry no category and are left
/// out.
pub fn sales_by_category(orders: &[Order], map: &CategoryMap) -> Vec<CategorySales> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();

    for order in orders {
        for line in order.lines() {
            if !matches!(line.kind(), LineKind::Product | LineKind::Service) {
                continue;
            }
            let category = map.category_for(line.display_name());
            *totals.entry(category).or_insert(Decimal::ZERO) +=
                from_minor_units(line.subtotal_minor());
        }
    }

    totals
        .into_iter()
        .map(|(name, value)| CategorySales { name, value })
        .collect()
}
