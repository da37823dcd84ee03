//! Fold a fetched order set into profitability aggregates: daily trend
//! series, per-item profit, and discount-impact rollups.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::cost::CostCatalog;
use crate::boulevard::types::{from_minor_units, LineKind, Order};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub sales: Decimal,
    pub profit: Decimal,
    pub transaction_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemProfitability {
    pub name: String,
    pub kind: LineKind,
    pub quantity: i64,
    pub total_sales: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub profit_margin_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountImpact {
    pub label: String,
    pub kind: LineKind,
    pub total_discount_amount: Decimal,
    pub usage_count: u32,
    pub estimated_profit_impact: Decimal,
    pub average_discount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ProfitSummary {
    pub total_sales: Decimal,
    pub total_transactions: u32,
    pub avg_transaction: Decimal,
    pub total_profit: Decimal,
    pub profit_margin_pct: Decimal,
    pub daily_trends: Vec<DailyMetric>,
    pub items: Vec<ItemProfitability>,
    pub discounts: Vec<DiscountImpact>,
}

fn discount_label(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Product => "Product discounts",
        LineKind::Service => "Service discounts",
        LineKind::Gratuity => "Gratuity discounts",
        LineKind::AccountCredit => "Account credit discounts",
    }
}

#[derive(Default)]
struct DayAccum {
    sales: Decimal,
    profit: Decimal,
    count: u32,
}

struct ItemAccum {
    kind: LineKind,
    quantity: i64,
    sales: Decimal,
    cost: Decimal,
}

struct DiscountAccum {
    kind: LineKind,
    total: Decimal,
    count: u32,
}

/// Reduce an order set into the full KPI aggregate.
///
/// Orders without a close timestamp or a numeric subtotal are skipped with a
/// warning; everything else folds in. The daily series is densified across
/// the observed date range, items are sorted by profit descending, discounts
/// by total amount descending. The input is never mutated, so repeated runs
/// over the same orders produce identical output.
pub fn aggregate(orders: &[Order], catalog: &CostCatalog) -> ProfitSummary {
    let mut days: BTreeMap<NaiveDate, DayAccum> = BTreeMap::new();
    let mut items: BTreeMap<String, ItemAccum> = BTreeMap::new();
    let mut discounts: BTreeMap<&'static str, DiscountAccum> = BTreeMap::new();

    let mut total_sales = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;
    let mut total_transactions = 0u32;

    for order in orders {
        let Some(closed_at) = order.closed_at else {
            tracing::warn!(order_id = %order.id, "Skipping order with no closedAt");
            continue;
        };
        let Some(subtotal_minor) = order.subtotal_minor() else {
            tracing::warn!(order_id = %order.id, "Skipping order with no numeric subtotal");
            continue;
        };

        let date = closed_at.date_naive();
        let order_sales = from_minor_units(subtotal_minor);
        total_sales += order_sales;
        total_transactions += 1;

        let mut order_cost = Decimal::ZERO;
        for line in order.lines() {
            let kind = line.kind();
            let quantity = line.quantity().max(0);
            let line_sales = from_minor_units(line.subtotal_minor());
            let unit_price = if quantity > 0 {
                line_sales / Decimal::from(quantity)
            } else {
                line_sales
            };

            let unit_cost = catalog.resolve_unit_cost(line.display_name(), kind, unit_price);
            let line_cost = unit_cost * Decimal::from(quantity);
            order_cost += line_cost;

            let item = items
                .entry(line.display_name().to_string())
                .or_insert_with(|| ItemAccum {
                    kind,
                    quantity: 0,
                    sales: Decimal::ZERO,
                    cost: Decimal::ZERO,
                });
            item.quantity += quantity;
            item.sales += line_sales;
            item.cost += line_cost;

            let discount_minor = line.discount_minor();
            if discount_minor > 0 {
                let bucket = discounts
                    .entry(discount_label(kind))
                    .or_insert_with(|| DiscountAccum {
                        kind,
                        total: Decimal::ZERO,
                        count: 0,
                    });
                bucket.total += from_minor_units(discount_minor);
                bucket.count += 1;
            }
        }

        total_cost += order_cost;
        let day = days.entry(date).or_default();
        day.sales += order_sales;
        day.profit += order_sales - order_cost;
        day.count += 1;
    }

    let total_profit = total_sales - total_cost;

    let mut item_rows: Vec<ItemProfitability> = items
        .into_iter()
        .map(|(name, accum)| {
            let profit = accum.sales - accum.cost;
            let margin = if accum.sales.is_zero() {
                Decimal::ZERO
            } else {
                (profit / accum.sales * HUNDRED).round_dp(2)
            };
            ItemProfitability {
                name,
                kind: accum.kind,
                quantity: accum.quantity,
                total_sales: accum.sales,
                total_cost: accum.cost,
                total_profit: profit,
                profit_margin_pct: margin,
            }
        })
        .collect();
    item_rows.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));

    let mut discount_rows: Vec<DiscountImpact> = discounts
        .into_iter()
        .map(|(label, accum)| DiscountImpact {
            label: label.to_string(),
            kind: accum.kind,
            total_discount_amount: accum.total,
            usage_count: accum.count,
            estimated_profit_impact: (accum.total
                * catalog.config().margin_loss_ratio(accum.kind))
            .round_dp(2),
            average_discount: (accum.total / Decimal::from(accum.count)).round_dp(2),
        })
        .collect();
    discount_rows.sort_by(|a, b| b.total_discount_amount.cmp(&a.total_discount_amount));

    ProfitSummary {
        total_sales,
        total_transactions,
        avg_transaction: if total_transactions == 0 {
            Decimal::ZERO
        } else {
            (total_sales / Decimal::from(total_transactions)).round_dp(2)
        },
        total_profit,
        profit_margin_pct: if total_sales.is_zero() {
            Decimal::ZERO
        } else {
            (total_profit / total_sales * HUNDRED).round_dp(2)
        },
        daily_trends: densify(days),
        items: item_rows,
        discounts: discount_rows,
    }
}

/// Expand the day buckets into a gapless series over the observed range,
/// zero-filling dates with no orders.
fn densify(days: BTreeMap<NaiveDate, DayAccum>) -> Vec<DailyMetric> {
    let (Some(first), Some(last)) = (days.keys().next().copied(), days.keys().last().copied())
    else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| match days.get(&date) {
            Some(day) => DailyMetric {
                date,
                sales: day.sales,
                profit: day.profit,
                transaction_count: day.count,
            },
            None => DailyMetric {
                date,
                sales: Decimal::ZERO,
                profit: Decimal::ZERO,
                transaction_count: 0,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_zeroed_summary() {
        let summary = aggregate(&[], &CostCatalog::empty());
        assert_eq!(summary.total_sales, Decimal::ZERO);
        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.avg_transaction, Decimal::ZERO);
        assert_eq!(summary.total_profit, Decimal::ZERO);
        assert_eq!(summary.profit_margin_pct, Decimal::ZERO);
        assert!(summary.daily_trends.is_empty());
        assert!(summary.items.is_empty());
        assert!(summary.discounts.is_empty());
    }

    #[test]
    fn densify_fills_interior_gaps() {
        let mut days = BTreeMap::new();
        days.insert(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            DayAccum {
                sales: Decimal::from(100),
                profit: Decimal::from(40),
                count: 1,
            },
        );
        days.insert(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            DayAccum {
                sales: Decimal::from(200),
                profit: Decimal::from(80),
                count: 2,
            },
        );

        let series = densify(days);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0].transaction_count, 1);
        for filler in &series[1..4] {
            assert_eq!(filler.sales, Decimal::ZERO);
            assert_eq!(filler.transaction_count, 0);
        }
        assert_eq!(series[4].sales, Decimal::from(200));
    }
}
