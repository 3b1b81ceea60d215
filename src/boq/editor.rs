//! Working copy of one item's breakdown
//!
//! Edits happen on a clone; the sheet only sees them on `commit`. Dropping
//! the editor discards them.

use crate::boq::sheet::BoqSheet;
use crate::breakdown::{RateBreakdown, RowEdit, Section};
use crate::core::config::RoundingPolicy;
use crate::core::error::Result;
use crate::core::types::ItemId;

#[derive(Debug, Clone)]
pub struct BreakdownEditor {
    item: ItemId,
    rounding: RoundingPolicy,
    original: RateBreakdown,
    working: RateBreakdown,
}

impl BreakdownEditor {
    /// Open the editor on an item that already has a breakdown
    ///
    /// `rounding` is the policy quoted prices are seeded with; staleness and
    /// reseeding are judged against it.
    pub fn open(sheet: &BoqSheet, item: ItemId, rounding: RoundingPolicy) -> Result<Self> {
        let original = sheet.view_breakdown(item)?.clone();
        Ok(Self {
            item,
            rounding,
            working: original.clone(),
            original,
        })
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn breakdown(&self) -> &RateBreakdown {
        &self.working
    }

    pub fn breakdown_mut(&mut self) -> &mut RateBreakdown {
        &mut self.working
    }

    pub fn update_row(&mut self, section: Section, index: usize, edit: RowEdit) -> Result<()> {
        self.working.update_row(section, index, edit)
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.original
    }

    /// True when the quoted unit price is no longer the rounded total
    pub fn is_stale(&self) -> bool {
        self.working.quoted_unit_price() != self.rounding.apply(self.working.total())
    }

    /// Reset the quoted unit price to the rounded current total
    pub fn reseed_quoted_price(&mut self) {
        self.working.reseed_quoted_price(self.rounding);
    }

    /// Reload the working copy from the sheet, discarding local edits
    ///
    /// Needed after the item's breakdown was replaced underneath the editor,
    /// e.g. by a regeneration.
    pub fn resync(&mut self, sheet: &BoqSheet) -> Result<()> {
        let current = sheet.view_breakdown(self.item)?.clone();
        self.working = current.clone();
        self.original = current;
        Ok(())
    }

    /// Write the working copy back as the item's authoritative breakdown
    pub fn commit(self, sheet: &mut BoqSheet) -> Result<()> {
        tracing::debug!("Committing edited breakdown for item {}", self.item);
        sheet.accept_breakdown(self.item, self.working)
    }
}
