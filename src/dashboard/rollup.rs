//! Project-wide rollups over the item list
//!
//! All functions are pure and recomputed from current item state. Items
//! without a breakdown contribute only to `total_cost` and the role list.

use crate::boq::BoqItem;
use crate::breakdown::Section;
use ahash::AHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket of the cost-by-type chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostType {
    Materials,
    Labor,
    Equipment,
    Tools,
    Overhead,
    Profit,
}

impl CostType {
    pub const ALL: [CostType; 6] = [
        CostType::Materials,
        CostType::Labor,
        CostType::Equipment,
        CostType::Tools,
        CostType::Overhead,
        CostType::Profit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostType::Materials => "Materials",
            CostType::Labor => "Labor",
            CostType::Equipment => "Equipment",
            CostType::Tools => "Tools",
            CostType::Overhead => "Overhead",
            CostType::Profit => "Profit",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<Section> for CostType {
    fn from(section: Section) -> Self {
        match section {
            Section::Materials => CostType::Materials,
            Section::Labor => CostType::Labor,
            Section::Equipment => CostType::Equipment,
            Section::Tools => CostType::Tools,
        }
    }
}

/// Quantity-weighted cost per cost type
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBreakdown {
    buckets: [f64; 6],
}

impl CostBreakdown {
    pub fn get(&self, cost_type: CostType) -> f64 {
        self.buckets[cost_type.index()]
    }

    fn add(&mut self, cost_type: CostType, amount: f64) {
        self.buckets[cost_type.index()] += amount;
    }

    pub fn total(&self) -> f64 {
        self.buckets.iter().fold(0.0, |acc, v| acc + v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CostType, f64)> + '_ {
        CostType::ALL.into_iter().map(move |t| (t, self.get(t)))
    }

    /// Whether any bucket holds a positive amount
    pub fn has_cost_data(&self) -> bool {
        self.buckets.iter().any(|v| *v > 0.0)
    }

    /// Each non-zero bucket's fraction of the whole, in bucket order
    pub fn shares(&self) -> Vec<(CostType, f64)> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        self.iter()
            .filter(|(_, v)| *v > 0.0)
            .map(|(t, v)| (t, v / total))
            .collect()
    }
}

impl Serialize for CostBreakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(CostType::ALL.len()))?;
        for (t, v) in self.iter() {
            map.serialize_entry(t.label(), &v)?;
        }
        map.end()
    }
}

/// Sum of every item's total
pub fn total_cost(items: &[BoqItem]) -> f64 {
    items.iter().fold(0.0, |acc, i| acc + i.total())
}

/// Direct cost: breakdown subtotal times quantity, before overhead and profit
pub fn total_dry_cost(items: &[BoqItem]) -> f64 {
    items
        .iter()
        .filter(|i| i.quantity() > 0.0)
        .filter_map(|i| i.rate_breakdown().map(|b| b.subtotal() * i.quantity()))
        .fold(0.0, |acc, v| acc + v)
}

pub fn cost_breakdown(items: &[BoqItem]) -> CostBreakdown {
    let mut breakdown = CostBreakdown::default();
    for item in items {
        let Some(bsr) = item.rate_breakdown() else {
            continue;
        };
        let qty = item.quantity();
        for section in Section::ALL {
            breakdown.add(section.into(), qty * bsr.section_cost(section));
        }
        breakdown.add(CostType::Overhead, qty * bsr.overhead().amount);
        breakdown.add(CostType::Profit, qty * bsr.profit().amount);
    }
    breakdown
}

/// Item totals grouped by category, for items with a breakdown
pub fn cost_by_category(items: &[BoqItem], default_category: &str) -> BTreeMap<String, f64> {
    let mut by_category = BTreeMap::new();
    for item in items.iter().filter(|i| i.rate_breakdown().is_some()) {
        let key = item.category().unwrap_or(default_category).to_string();
        *by_category.entry(key).or_insert(0.0) += item.total();
    }
    by_category
}

/// Distinct roles named in the items' manpower text, sorted
pub fn manpower_roles(items: &[BoqItem]) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut roles: Vec<String> = items
        .iter()
        .flat_map(|i| i.manpower().split(','))
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .filter(|r| seen.insert(r.to_string()))
        .map(str::to_string)
        .collect();
    roles.sort();
    roles
}
