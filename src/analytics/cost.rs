//! Unit-cost resolution: exact table hit, then nearest-name match, then a
//! kind-based default ratio.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::similarity::normalized_similarity;
use crate::boulevard::types::LineKind;

/// One row of the supplied inventory cost table, keyed by display name.
#[derive(Debug, Clone)]
pub struct InventoryCostEntry {
    pub item_name: String,
    pub average_unit_cost: Decimal,
}

/// Tunables for the fallback chain. The threshold and ratios are heuristics
/// open to tuning, not upstream-specified values.
#[derive(Debug, Clone)]
pub struct CostConfig {
    /// Minimum normalized similarity for an approximate name match.
    pub similarity_threshold: f64,
    /// Assumed cost as a fraction of price for physical products.
    pub product_cost_ratio: Decimal,
    /// Assumed cost as a fraction of price for services.
    pub service_cost_ratio: Decimal,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            product_cost_ratio: Decimal::new(50, 2),
            service_cost_ratio: Decimal::new(35, 2),
        }
    }
}

impl CostConfig {
    pub fn default_cost_ratio(&self, kind: LineKind) -> Decimal {
        match kind {
            LineKind::Product => self.product_cost_ratio,
            LineKind::Service => self.service_cost_ratio,
            // Gratuities and account credits carry no cost of goods.
            LineKind::Gratuity | LineKind::AccountCredit => Decimal::ZERO,
        }
    }

    /// Fraction of a discounted amount assumed to come out of margin.
    pub fn margin_loss_ratio(&self, kind: LineKind) -> Decimal {
        Decimal::ONE - self.default_cost_ratio(kind)
    }
}

pub struct CostCatalog {
    entries: BTreeMap<String, Decimal>,
    config: CostConfig,
}

impl CostCatalog {
    pub fn new(entries: Vec<InventoryCostEntry>, config: CostConfig) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.item_name, e.average_unit_cost))
                .collect(),
            config,
        }
    }

    pub fn from_entries(entries: Vec<InventoryCostEntry>) -> Self {
        Self::new(entries, CostConfig::default())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), CostConfig::default())
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    /// Table-backed lookup only: verbatim name first, then the single
    /// nearest name at or above the similarity threshold. `None` means the
    /// table has no usable answer.
    pub fn lookup(&self, name: &str) -> Option<Decimal> {
        if let Some(cost) = self.entries.get(name) {
            return Some(*cost);
        }
        self.nearest(name)
    }

    fn nearest(&self, name: &str) -> Option<Decimal> {
        let needle = name.to_lowercase();
        let mut best: Option<(f64, &str, Decimal)> = None;

        // BTreeMap iteration order makes tie-breaking deterministic: the
        // lexicographically first of equally-near names wins.
        for (candidate, cost) in &self.entries {
            let score = normalized_similarity(&needle, &candidate.to_lowercase());
            if score < self.config.similarity_threshold {
                continue;
            }
            match best {
                Some((best_score, _, _)) if best_score >= score => {}
                _ => best = Some((score, candidate.as_str(), *cost)),
            }
        }

        best.map(|(score, matched, cost)| {
            tracing::debug!(name, matched, score, "Resolved cost via approximate name match");
            cost
        })
    }

    /// Resolve a unit cost for a line item. Falls back to the kind's default
    /// cost ratio applied to the line's own unit price when the table has no
    /// exact or near match. Deterministic for identical inputs.
    pub fn resolve_unit_cost(&self, name: &str, kind: LineKind, unit_price: Decimal) -> Decimal {
        if let Some(cost) = self.lookup(name) {
            return cost;
        }
        self.config.default_cost_ratio(kind) * unit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CostCatalog {
        CostCatalog::from_entries(vec![
            InventoryCostEntry {
                item_name: "Signature Hydrafacial".into(),
                average_unit_cost: Decimal::new(6500, 2),
            },
            InventoryCostEntry {
                item_name: "Botox Injection (per unit)".into(),
                average_unit_cost: Decimal::new(550, 2),
            },
        ])
    }

    #[test]
    fn exact_match_wins_regardless_of_kind() {
        let catalog = catalog();
        let expected = Decimal::new(6500, 2);
        for kind in [LineKind::Product, LineKind::Service, LineKind::Gratuity] {
            assert_eq!(
                catalog.resolve_unit_cost("Signature Hydrafacial", kind, Decimal::from(199)),
                expected
            );
        }
    }

    #[test]
    fn near_name_resolves_to_nearest_entry() {
        let catalog = catalog();
        // One trailing character off; similarity well above the 0.8 cutoff.
        assert_eq!(
            catalog.resolve_unit_cost("Signature Hydrafacials", LineKind::Service, Decimal::from(199)),
            Decimal::new(6500, 2)
        );
    }

    #[test]
    fn below_threshold_falls_to_kind_ratio() {
        // The ratio fallback is an assumed approximation of cost, not data
        // from the table; these figures only have to be stable, not true.
        let catalog = catalog();
        assert_eq!(
            catalog.resolve_unit_cost("Mystery Serum", LineKind::Product, Decimal::from(100)),
            Decimal::from(50)
        );
        assert_eq!(
            catalog.resolve_unit_cost("Mystery Treatment", LineKind::Service, Decimal::from(100)),
            Decimal::from(35)
        );
        assert_eq!(
            catalog.resolve_unit_cost("Gratuity", LineKind::Gratuity, Decimal::from(100)),
            Decimal::ZERO
        );
    }

    #[test]
    fn lookup_exposes_table_misses() {
        let catalog = catalog();
        assert!(catalog.lookup("Mystery Serum").is_none());
        assert!(catalog.lookup("Signature Hydrafacial").is_some());
    }

    #[test]
    fn resolution_is_deterministic() {
        let catalog = catalog();
        let a = catalog.resolve_unit_cost("Botox Injection (per unt)", LineKind::Service, Decimal::from(15));
        let b = catalog.resolve_unit_cost("Botox Injection (per unt)", LineKind::Service, Decimal::from(15));
        assert_eq!(a, b);
    }

    #[test]
    fn margin_loss_ratio_complements_cost_ratio() {
        let config = CostConfig::default();
        assert_eq!(config.margin_loss_ratio(LineKind::Product), Decimal::new(50, 2));
        assert_eq!(config.margin_loss_ratio(LineKind::Service), Decimal::new(65, 2));
        assert_eq!(config.margin_loss_ratio(LineKind::Gratuity), Decimal::ONE);
    }
}
