//! Breakdown layer - cost lines and the rate breakdown engine

pub mod engine;
pub mod line;

pub use engine::{
    compute_totals, Adjustment, BreakdownDraft, BreakdownTotals, PercentageInput, RateBreakdown,
};
pub use line::{
    CostLine, EquipmentLine, LaborLine, MaterialLine, RowEdit, Section, ToolLine,
};
