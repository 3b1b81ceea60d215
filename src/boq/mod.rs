//! Bill of Quantities: line items, the sheet that owns them, and breakdown editing

pub mod editor;
pub mod item;
pub mod sheet;

pub use editor::BreakdownEditor;
pub use item::{BoqItem, ItemField, ItemStatus};
pub use sheet::{BoqSheet, ProposalText};
