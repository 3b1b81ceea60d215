//! BOQ sheet - the ordered list of line items and the selection over them
//!
//! The sheet owns every item's authoritative unit price and total. Only two
//! paths change a total: a quantity/unit-price edit and breakdown acceptance.

use crate::boq::item::{BoqItem, ItemField, ItemStatus};
use crate::breakdown::RateBreakdown;
use crate::core::error::{EstimateError, Result};
use crate::core::types::{next_id, ItemId};
use ahash::AHashSet;

/// Text fields a proposal writes alongside its breakdown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalText {
    pub manpower: String,
    pub unit: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BoqSheet {
    items: Vec<BoqItem>,
    selection: AHashSet<ItemId>,
}

impl BoqSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[BoqItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&BoqItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    fn get_mut(&mut self, id: ItemId) -> Result<&mut BoqItem> {
        self.items
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or(EstimateError::ItemNotFound(id))
    }

    /// Append an empty item with a fresh id
    pub fn add_item(&mut self) -> ItemId {
        let id = ItemId(next_id(self.items.iter().map(|i| i.id().0)));
        self.items.push(BoqItem::new(id));
        id
    }

    /// Set one field; quantity and unit price edits recompute the total
    pub fn update_field(&mut self, id: ItemId, field: ItemField) -> Result<()> {
        self.get_mut(id)?.apply(field);
        Ok(())
    }

    /// Delete the given items and drop them from the selection
    ///
    /// Returns how many items were removed. Unknown ids are ignored.
    pub fn remove_items(&mut self, ids: &[ItemId]) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !ids.contains(&i.id()));
        for id in ids {
            self.selection.remove(id);
        }
        before - self.items.len()
    }

    /// Make `breakdown` authoritative for the item's price
    ///
    /// Sets `unit_price` to the quoted unit price, recomputes the total,
    /// marks the item AI-assisted and successful.
    pub fn accept_breakdown(&mut self, id: ItemId, breakdown: RateBreakdown) -> Result<()> {
        let item = self.get_mut(id)?;
        item.accept_breakdown(breakdown);
        tracing::debug!(
            "Accepted breakdown for item {}: unit price {:.2}, total {:.2}",
            id,
            item.unit_price(),
            item.total()
        );
        Ok(())
    }

    /// Accept a proposal: its text fields and its breakdown, all at once
    pub fn accept_proposal(
        &mut self,
        id: ItemId,
        text: ProposalText,
        breakdown: RateBreakdown,
    ) -> Result<()> {
        let item = self.get_mut(id)?;
        item.apply(ItemField::Manpower(text.manpower));
        item.apply(ItemField::Unit(text.unit));
        item.apply(ItemField::Category(text.category));
        self.accept_breakdown(id, breakdown)
    }

    /// The item's breakdown, or `NoBreakdown` when it has not been costed
    pub fn view_breakdown(&self, id: ItemId) -> Result<&RateBreakdown> {
        let item = self.get(id).ok_or(EstimateError::ItemNotFound(id))?;
        item.rate_breakdown().ok_or(EstimateError::NoBreakdown(id))
    }

    /// The item, if it can be sent for costing (non-empty description)
    pub fn costable_item(&self, id: ItemId) -> Result<&BoqItem> {
        let item = self.get(id).ok_or(EstimateError::ItemNotFound(id))?;
        if item.description().trim().is_empty() {
            return Err(EstimateError::EmptyDescription(id));
        }
        Ok(item)
    }

    pub fn set_status(&mut self, id: ItemId, status: ItemStatus) -> Result<()> {
        self.update_field(id, ItemField::Status(status))
    }

    // === SELECTION ===

    /// Add or remove one item from the selection
    ///
    /// Returns false for ids not on the sheet; they are never selected.
    pub fn select(&mut self, id: ItemId, selected: bool) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if selected {
            self.selection.insert(id);
        } else {
            self.selection.remove(&id);
        }
        true
    }

    /// Select every item, or clear the selection
    pub fn select_all(&mut self, selected: bool) {
        self.selection.clear();
        if selected {
            self.selection.extend(self.items.iter().map(|i| i.id()));
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected ids in sheet order
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .map(|i| i.id())
            .filter(|id| self.selection.contains(id))
            .collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }
}
