//! Rate breakdown engine - subtotal, overhead, profit, and total for one unit of work
//!
//! ```text
//! subtotal = materials + labor + equipment + tools
//! overhead = subtotal * overhead% / 100
//! profit   = (subtotal + overhead) * profit% / 100
//! total    = subtotal + overhead + profit
//! ```
//!
//! Overhead is applied before profit and the profit base includes overhead.
//! The quoted unit price is seeded from the total when a breakdown is created
//! and is an independent field afterwards.

use crate::breakdown::line::{
    section_total, CostLine, EquipmentLine, LaborLine, MaterialLine, RowEdit, Section, ToolLine,
};
use crate::core::config::RoundingPolicy;
use crate::core::error::{EstimateError, Result};
use crate::core::types::clamp_amount;
use serde::{Deserialize, Serialize};

/// A percentage-based addition and the amount it yields
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Adjustment {
    pub percentage: f64,
    pub amount: f64,
}

/// The four derived figures of a breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BreakdownTotals {
    pub subtotal: f64,
    pub overhead_amount: f64,
    pub profit_amount: f64,
    pub total: f64,
}

/// Apply overhead then profit to a subtotal
pub fn compute_totals(subtotal: f64, overhead_percentage: f64, profit_percentage: f64) -> BreakdownTotals {
    let overhead_amount = subtotal * overhead_percentage / 100.0;
    let profit_amount = (subtotal + overhead_amount) * profit_percentage / 100.0;
    BreakdownTotals {
        subtotal,
        overhead_amount,
        profit_amount,
        total: subtotal + overhead_amount + profit_amount,
    }
}

/// Percentage-only adjustment as delivered by a proposal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentageInput {
    pub percentage: f64,
}

/// Raw breakdown shape: rows plus percentages, no derived figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownDraft {
    #[serde(default)]
    pub materials: Vec<MaterialLine>,
    #[serde(default)]
    pub labor: Vec<LaborLine>,
    #[serde(default)]
    pub equipment: Vec<EquipmentLine>,
    #[serde(default)]
    pub tools: Vec<ToolLine>,
    pub overhead: PercentageInput,
    pub profit: PercentageInput,
}

impl BreakdownDraft {
    /// Every problem that would make this draft unacceptable
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut check = |section: Section, index: usize, fields: Vec<&'static str>| {
            for field in fields {
                problems.push(format!("{}[{}].{} is not a non-negative number", section.name(), index, field));
            }
        };
        for (i, l) in self.materials.iter().enumerate() {
            check(Section::Materials, i, l.invalid_fields());
        }
        for (i, l) in self.labor.iter().enumerate() {
            check(Section::Labor, i, l.invalid_fields());
        }
        for (i, l) in self.equipment.iter().enumerate() {
            check(Section::Equipment, i, l.invalid_fields());
        }
        for (i, l) in self.tools.iter().enumerate() {
            check(Section::Tools, i, l.invalid_fields());
        }

        for (name, pct) in [("overhead", self.overhead.percentage), ("profit", self.profit.percentage)] {
            if !pct.is_finite() || pct < 0.0 {
                problems.push(format!("{}.percentage is not a non-negative number", name));
            }
        }

        problems
    }
}

/// Breakdown of Schedule of Rates for one BOQ line item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBreakdown {
    materials: Vec<MaterialLine>,
    labor: Vec<LaborLine>,
    equipment: Vec<EquipmentLine>,
    tools: Vec<ToolLine>,
    subtotal: f64,
    overhead: Adjustment,
    profit: Adjustment,
    total: f64,
    quoted_unit_price: f64,
}

impl RateBreakdown {
    /// Build a breakdown from a draft
    ///
    /// The draft is rejected as a whole if any number is negative or not
    /// finite. Row costs are re-derived, the totals computed, and the quoted
    /// unit price seeded as `rounding(total)`.
    pub fn from_draft(draft: BreakdownDraft, rounding: RoundingPolicy) -> Result<Self> {
        let problems = draft.problems();
        if !problems.is_empty() {
            return Err(EstimateError::MalformedProposal(problems.join("; ")));
        }

        let mut breakdown = Self {
            materials: draft.materials,
            labor: draft.labor,
            equipment: draft.equipment,
            tools: draft.tools,
            subtotal: 0.0,
            overhead: Adjustment {
                percentage: draft.overhead.percentage,
                amount: 0.0,
            },
            profit: Adjustment {
                percentage: draft.profit.percentage,
                amount: 0.0,
            },
            total: 0.0,
            quoted_unit_price: 0.0,
        };
        breakdown.recompute();
        breakdown.reseed_quoted_price(rounding);
        Ok(breakdown)
    }

    /// The rows and percentages of this breakdown, without derived figures
    pub fn to_draft(&self) -> BreakdownDraft {
        BreakdownDraft {
            materials: self.materials.clone(),
            labor: self.labor.clone(),
            equipment: self.equipment.clone(),
            tools: self.tools.clone(),
            overhead: PercentageInput {
                percentage: self.overhead.percentage,
            },
            profit: PercentageInput {
                percentage: self.profit.percentage,
            },
        }
    }

    pub fn materials(&self) -> &[MaterialLine] {
        &self.materials
    }

    pub fn labor(&self) -> &[LaborLine] {
        &self.labor
    }

    pub fn equipment(&self) -> &[EquipmentLine] {
        &self.equipment
    }

    pub fn tools(&self) -> &[ToolLine] {
        &self.tools
    }

    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }

    pub fn overhead(&self) -> Adjustment {
        self.overhead
    }

    pub fn profit(&self) -> Adjustment {
        self.profit
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn quoted_unit_price(&self) -> f64 {
        self.quoted_unit_price
    }

    /// Sum of row costs in one section
    pub fn section_cost(&self, section: Section) -> f64 {
        match section {
            Section::Materials => section_total(&self.materials),
            Section::Labor => section_total(&self.labor),
            Section::Equipment => section_total(&self.equipment),
            Section::Tools => section_total(&self.tools),
        }
    }

    pub fn row_count(&self, section: Section) -> usize {
        match section {
            Section::Materials => self.materials.len(),
            Section::Labor => self.labor.len(),
            Section::Equipment => self.equipment.len(),
            Section::Tools => self.tools.len(),
        }
    }

    /// Re-derive every row cost, then subtotal, overhead, profit, and total
    ///
    /// Idempotent. Leaves the quoted unit price alone.
    pub fn recompute(&mut self) {
        self.materials.iter_mut().for_each(|l| l.recompute());
        self.labor.iter_mut().for_each(|l| l.recompute());
        self.equipment.iter_mut().for_each(|l| l.recompute());
        self.tools.iter_mut().for_each(|l| l.recompute());

        let subtotal = Section::ALL
            .iter()
            .fold(0.0, |acc, s| acc + self.section_cost(*s));
        let totals = compute_totals(subtotal, self.overhead.percentage, self.profit.percentage);

        self.subtotal = totals.subtotal;
        self.overhead.amount = totals.overhead_amount;
        self.profit.amount = totals.profit_amount;
        self.total = totals.total;
    }

    /// Whether the derived figures match the rows and percentages
    pub fn is_consistent(&self) -> bool {
        let mut fresh = self.clone();
        fresh.recompute();
        fresh.subtotal == self.subtotal
            && fresh.overhead == self.overhead
            && fresh.profit == self.profit
            && fresh.total == self.total
            && fresh.materials == self.materials
            && fresh.labor == self.labor
            && fresh.equipment == self.equipment
            && fresh.tools == self.tools
    }

    /// Reset the quoted unit price to the rounded total
    pub fn reseed_quoted_price(&mut self, rounding: RoundingPolicy) {
        self.quoted_unit_price = rounding.apply(self.total);
    }

    pub fn set_quoted_unit_price(&mut self, price: f64) {
        self.quoted_unit_price = clamp_amount(price);
    }

    pub fn set_overhead_percentage(&mut self, percentage: f64) {
        self.overhead.percentage = clamp_amount(percentage);
        self.recompute();
    }

    pub fn set_profit_percentage(&mut self, percentage: f64) {
        self.profit.percentage = clamp_amount(percentage);
        self.recompute();
    }

    /// Append a blank row to a section, returning its index
    ///
    /// Material rows start at quantity 1; every other number starts at 0.
    pub fn add_row(&mut self, section: Section) -> usize {
        let index = self.row_count(section);
        match section {
            Section::Materials => self.materials.push(MaterialLine::default()),
            Section::Labor => self.labor.push(LaborLine::default()),
            Section::Equipment => self.equipment.push(EquipmentLine::default()),
            Section::Tools => self.tools.push(ToolLine::default()),
        }
        self.recompute();
        index
    }

    /// Edit one field of one row
    pub fn update_row(&mut self, section: Section, index: usize, edit: RowEdit) -> Result<()> {
        let out_of_range = EstimateError::RowOutOfRange {
            section: section.name(),
            index,
        };
        match section {
            Section::Materials => self.materials.get_mut(index).ok_or(out_of_range)?.apply(edit)?,
            Section::Labor => self.labor.get_mut(index).ok_or(out_of_range)?.apply(edit)?,
            Section::Equipment => self.equipment.get_mut(index).ok_or(out_of_range)?.apply(edit)?,
            Section::Tools => self.tools.get_mut(index).ok_or(out_of_range)?.apply(edit)?,
        }
        self.recompute();
        Ok(())
    }

    pub fn remove_row(&mut self, section: Section, index: usize) -> Result<()> {
        if index >= self.row_count(section) {
            return Err(EstimateError::RowOutOfRange {
                section: section.name(),
                index,
            });
        }
        match section {
            Section::Materials => {
                self.materials.remove(index);
            }
            Section::Labor => {
                self.labor.remove(index);
            }
            Section::Equipment => {
                self.equipment.remove(index);
            }
            Section::Tools => {
                self.tools.remove(index);
            }
        }
        self.recompute();
        Ok(())
    }
}
