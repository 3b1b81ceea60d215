//! BOQ Estimator - construction cost estimation with rate breakdowns
//!
//! Line items of a Bill of Quantities carry an optional Breakdown of
//! Schedule of Rates. The engine keeps every derived figure consistent:
//! row costs, breakdown totals, item totals, and the project dashboard.

pub mod boq;
pub mod breakdown;
pub mod core;
pub mod dashboard;
pub mod export;
pub mod llm;
pub mod project;
pub mod rates;
pub mod session;
