//! Project files - a BOQ and its metadata in TOML
//!
//! ```toml
//! name = "Al Waab Villa"
//! client = "Private Villa Client"
//! active_client = 3
//!
//! [[items]]
//! description = "200mm hollow blockwork"
//! quantity = 420
//!
//! [items.breakdown]
//! overhead = { percentage = 10 }
//! profit = { percentage = 12 }
//! labor = [{ role = "Mason", hours = 0.6, rate = 15.8 }]
//! ```
//!
//! Breakdowns go through the normal acceptance path, so their derived
//! figures and quoted prices are always recomputed on load.

use crate::boq::ItemField;
use crate::breakdown::{BreakdownDraft, RateBreakdown};
use crate::core::config::EstimatorConfig;
use crate::core::error::{EstimateError, Result};
use crate::core::types::ClientId;
use crate::rates::RateCatalog;
use crate::session::{ProjectSession, DEFAULT_DURATION_DAYS};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TomlProject {
    #[serde(default)]
    name: String,
    #[serde(default)]
    client: String,
    #[serde(default)]
    general_notes: String,
    #[serde(default)]
    scope_of_work: String,
    #[serde(default = "default_duration")]
    duration_days: u32,
    #[serde(default)]
    active_client: Option<u32>,
    #[serde(default)]
    items: Vec<TomlItem>,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_DAYS
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    #[serde(default)]
    description: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    quantity: f64,
    /// Manual price; when a breakdown is also given this overrides its quote
    #[serde(default)]
    unit_price: Option<f64>,
    #[serde(default)]
    manpower: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    breakdown: Option<BreakdownDraft>,
}

/// Load a project file into a new session
pub fn load_project(path: &Path, config: EstimatorConfig, catalog: RateCatalog) -> Result<ProjectSession> {
    let content = std::fs::read_to_string(path)?;
    let session = parse_project(&content, config, catalog)?;
    tracing::info!(
        "Loaded project '{}' from {}: {} items",
        session.project_name,
        path.display(),
        session.sheet().len()
    );
    Ok(session)
}

/// Parse a project from a TOML string
pub fn parse_project(content: &str, config: EstimatorConfig, catalog: RateCatalog) -> Result<ProjectSession> {
    let data: TomlProject =
        toml::from_str(content).map_err(|e| EstimateError::ConfigError(e.to_string()))?;

    let rounding = config.rounding;
    let mut session = ProjectSession::new(config, catalog);
    session.project_name = data.name;
    session.client_name = data.client;
    session.general_notes = data.general_notes;
    session.scope_of_work = data.scope_of_work;
    session.duration_days = data.duration_days;
    if let Some(id) = data.active_client {
        session.set_active_client(ClientId(id))?;
    }

    for item in data.items {
        let sheet = session.sheet_mut();
        let id = sheet.add_item();
        sheet.update_field(id, ItemField::Description(item.description))?;
        sheet.update_field(id, ItemField::Unit(item.unit))?;
        sheet.update_field(id, ItemField::Manpower(item.manpower))?;
        sheet.update_field(id, ItemField::Notes(item.notes))?;
        sheet.update_field(id, ItemField::Category(item.category))?;
        sheet.update_field(id, ItemField::Quantity(item.quantity))?;

        if let Some(draft) = item.breakdown {
            let breakdown = RateBreakdown::from_draft(draft, rounding)
                .map_err(|e| EstimateError::ConfigError(format!("item {}: {}", id, e)))?;
            sheet.accept_breakdown(id, breakdown)?;
        }
        if let Some(price) = item.unit_price {
            sheet.update_field(id, ItemField::UnitPrice(price))?;
        }
    }

    Ok(session)
}
