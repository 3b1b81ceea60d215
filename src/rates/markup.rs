//! Client markup - scale labour and plant rates for a costing pass
//!
//! Applied once per costing pass, right before the rates are handed to the
//! proposal generator. The catalog itself is never modified.

use crate::rates::catalog::{ClientProfile, EquipmentRate, MaterialRate, RateCatalog};
use serde::Serialize;

/// Hourly rate of a role as used in one costing pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRate {
    pub role: String,
    pub hourly_rate: f64,
}

/// Rates in effect for one costing pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostingRates {
    pub manpower: Vec<RoleRate>,
    pub equipment: Vec<EquipmentRate>,
    /// Passed through unmodified
    pub materials: Vec<MaterialRate>,
}

/// Multiplier for a markup percentage: 1 + pct / 100
pub fn markup_factor(markup_percentage: f64) -> f64 {
    1.0 + markup_percentage / 100.0
}

/// Marked-up rate lists for `client`
///
/// Manpower and equipment hourly rates are multiplied by the client's markup
/// factor. Material rates are copied as-is. Without a client the rates pass
/// through at 0%.
pub fn apply_markup(catalog: &RateCatalog, client: Option<&ClientProfile>) -> CostingRates {
    let factor = markup_factor(client.map(|c| c.markup_percentage).unwrap_or(0.0));

    CostingRates {
        manpower: catalog
            .manpower()
            .iter()
            .map(|r| RoleRate {
                role: r.role.clone(),
                hourly_rate: r.effective_hourly_rate() * factor,
            })
            .collect(),
        equipment: catalog
            .equipment()
            .iter()
            .map(|r| EquipmentRate {
                hourly_rate: r.hourly_rate * factor,
                ..r.clone()
            })
            .collect(),
        materials: catalog.materials().to_vec(),
    }
}
