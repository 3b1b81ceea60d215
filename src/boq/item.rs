//! BOQ line items

use crate::breakdown::RateBreakdown;
use crate::core::types::{clamp_amount, ItemId};
use serde::{Deserialize, Serialize};

/// Lifecycle of an item's costing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Idle,
    /// A proposal for this item is in flight
    Loading,
    /// The last proposal was accepted
    Success,
    /// The last proposal failed; prior data is untouched
    Error,
}

/// A single-field edit to a line item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemField {
    Description(String),
    Unit(String),
    Quantity(f64),
    UnitPrice(f64),
    Manpower(String),
    Notes(String),
    Category(Option<String>),
    Status(ItemStatus),
}

/// One line of the Bill of Quantities
///
/// `total == quantity * unit_price` holds after every write. While a
/// breakdown exists, `unit_price` follows its quoted unit price until the
/// user edits the unit price directly; the breakdown is then stale but kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqItem {
    id: ItemId,
    description: String,
    unit: String,
    quantity: f64,
    manpower: String,
    unit_price: f64,
    total: f64,
    rate_breakdown: Option<RateBreakdown>,
    is_ai_assisted: bool,
    status: ItemStatus,
    notes: String,
    category: Option<String>,
}

impl BoqItem {
    /// Empty item: no description, quantity 0, no breakdown, idle
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            description: String::new(),
            unit: String::new(),
            quantity: 0.0,
            manpower: String::new(),
            unit_price: 0.0,
            total: 0.0,
            rate_breakdown: None,
            is_ai_assisted: false,
            status: ItemStatus::Idle,
            notes: String::new(),
            category: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Free-text crew summary, e.g. "1 Mason, 2 Helpers"
    pub fn manpower(&self) -> &str {
        &self.manpower
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn rate_breakdown(&self) -> Option<&RateBreakdown> {
        self.rate_breakdown.as_ref()
    }

    pub fn is_ai_assisted(&self) -> bool {
        self.is_ai_assisted
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// True when a breakdown exists but the unit price no longer follows it
    pub fn is_breakdown_stale(&self) -> bool {
        self.rate_breakdown
            .as_ref()
            .is_some_and(|b| b.quoted_unit_price() != self.unit_price)
    }

    pub(crate) fn apply(&mut self, field: ItemField) {
        match field {
            ItemField::Description(v) => self.description = v,
            ItemField::Unit(v) => self.unit = v,
            ItemField::Manpower(v) => self.manpower = v,
            ItemField::Notes(v) => self.notes = v,
            ItemField::Category(v) => self.category = v.filter(|c| !c.trim().is_empty()),
            ItemField::Status(v) => self.status = v,
            ItemField::Quantity(v) => {
                self.quantity = clamp_amount(v);
                self.recompute_total();
            }
            ItemField::UnitPrice(v) => {
                self.unit_price = clamp_amount(v);
                self.recompute_total();
            }
        }
    }

    /// Make `breakdown` authoritative for this item's price
    pub(crate) fn accept_breakdown(&mut self, breakdown: RateBreakdown) {
        self.unit_price = breakdown.quoted_unit_price();
        self.rate_breakdown = Some(breakdown);
        self.recompute_total();
        self.is_ai_assisted = true;
        self.status = ItemStatus::Success;
    }

    fn recompute_total(&mut self) {
        self.total = self.quantity * self.unit_price;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::{BreakdownDraft, PercentageInput, ToolLine};
    use crate::core::config::RoundingPolicy;

    fn breakdown(tool_cost: f64) -> RateBreakdown {
        let draft = BreakdownDraft {
            tools: vec![ToolLine::new("Lump sum", tool_cost)],
            overhead: PercentageInput { percentage: 0.0 },
            profit: PercentageInput { percentage: 0.0 },
            ..Default::default()
        };
        RateBreakdown::from_draft(draft, RoundingPolicy::HalfUp).unwrap()
    }

    #[test]
    fn test_new_item_is_empty() {
        let item = BoqItem::new(ItemId(1));
        assert_eq!(item.quantity(), 0.0);
        assert_eq!(item.total(), 0.0);
        assert!(item.rate_breakdown().is_none());
        assert_eq!(item.status(), ItemStatus::Idle);
        assert!(!item.is_ai_assisted());
    }

    #[test]
    fn test_quantity_and_price_keep_total() {
        let mut item = BoqItem::new(ItemId(1));
        item.apply(ItemField::Quantity(12.0));
        assert_eq!(item.total(), 0.0);
        item.apply(ItemField::UnitPrice(7.5));
        assert_eq!(item.total(), 90.0);
        item.apply(ItemField::Quantity(2.0));
        assert_eq!(item.total(), 15.0);
    }

    #[test]
    fn test_text_fields_do_not_touch_total() {
        let mut item = BoqItem::new(ItemId(1));
        item.apply(ItemField::Quantity(2.0));
        item.apply(ItemField::UnitPrice(3.0));
        item.apply(ItemField::Description("Blockwork".into()));
        item.apply(ItemField::Notes("200mm".into()));
        assert_eq!(item.total(), 6.0);
        assert_eq!(item.description(), "Blockwork");
    }

    #[test]
    fn test_blank_category_is_none() {
        let mut item = BoqItem::new(ItemId(1));
        item.apply(ItemField::Category(Some("  ".into())));
        assert_eq!(item.category(), None);
        item.apply(ItemField::Category(Some("Masonry".into())));
        assert_eq!(item.category(), Some("Masonry"));
    }

    #[test]
    fn test_accept_breakdown_sets_price() {
        let mut item = BoqItem::new(ItemId(1));
        item.apply(ItemField::Quantity(10.0));
        item.accept_breakdown(breakdown(42.4));
        assert_eq!(item.unit_price(), 42.0);
        assert_eq!(item.total(), 420.0);
        assert!(item.is_ai_assisted());
        assert_eq!(item.status(), ItemStatus::Success);
        assert!(!item.is_breakdown_stale());
    }

    #[test]
    fn test_manual_price_makes_breakdown_stale() {
        let mut item = BoqItem::new(ItemId(1));
        item.apply(ItemField::Quantity(10.0));
        item.accept_breakdown(breakdown(42.4));
        item.apply(ItemField::UnitPrice(50.0));
        assert!(item.is_breakdown_stale());
        assert!(item.rate_breakdown().is_some());
        assert_eq!(item.total(), 500.0);
    }
}
