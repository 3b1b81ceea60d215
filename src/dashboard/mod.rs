//! Project dashboard: totals, cost by type, cost by category, crew roles

pub mod rollup;
pub mod summary;

pub use rollup::{
    cost_breakdown, cost_by_category, manpower_roles, total_cost, total_dry_cost, CostBreakdown,
    CostType,
};
pub use summary::{summarize, DashboardSummary};
