//! Rate catalog - canonical unit rates for manpower, equipment, and materials
//!
//! Manpower rates are stored as their cost components; the effective hourly
//! rate is recomputed on every write and never trusted from input.

use crate::core::error::{EstimateError, Result};
use crate::core::types::{clamp_amount, next_id, ClientId, RateId};
use serde::{Deserialize, Serialize};

/// Paid hours per working day
pub const HOURS_PER_DAY: f64 = 8.0;
/// Working days per month
pub const WORKING_DAYS_PER_MONTH: f64 = 26.0;
/// Months per year
pub const MONTHS_PER_YEAR: f64 = 12.0;
/// Day basis for converting a monthly salary to a daily one (gratuity accrual)
pub const SALARY_DAY_BASIS: f64 = 30.0;

/// Billable hours in a year: 8 * 26 * 12 = 2496
pub const ANNUAL_HOURS: f64 = HOURS_PER_DAY * WORKING_DAYS_PER_MONTH * MONTHS_PER_YEAR;

/// Cost components of one manpower role (QAR)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManpowerCosts {
    pub monthly_salary: f64,
    /// Monthly accommodation allowance
    pub accommodation: f64,
    /// Monthly transport allowance
    pub transport: f64,
    pub visa_cost_per_year: f64,
    pub annual_flight_ticket_cost: f64,
    /// Days of basic salary accrued as end-of-service gratuity per year
    pub leave_settlement_days_per_year: f64,
}

impl ManpowerCosts {
    /// Copy with every component clamped to a finite non-negative value
    pub fn clamped(self) -> Self {
        Self {
            monthly_salary: clamp_amount(self.monthly_salary),
            accommodation: clamp_amount(self.accommodation),
            transport: clamp_amount(self.transport),
            visa_cost_per_year: clamp_amount(self.visa_cost_per_year),
            annual_flight_ticket_cost: clamp_amount(self.annual_flight_ticket_cost),
            leave_settlement_days_per_year: clamp_amount(self.leave_settlement_days_per_year),
        }
    }

    fn set(&mut self, field: ManpowerField, value: f64) {
        let value = clamp_amount(value);
        match field {
            ManpowerField::MonthlySalary => self.monthly_salary = value,
            ManpowerField::Accommodation => self.accommodation = value,
            ManpowerField::Transport => self.transport = value,
            ManpowerField::VisaCostPerYear => self.visa_cost_per_year = value,
            ManpowerField::AnnualFlightTicketCost => self.annual_flight_ticket_cost = value,
            ManpowerField::LeaveSettlementDaysPerYear => {
                self.leave_settlement_days_per_year = value
            }
        }
    }
}

/// Fully loaded cost of one hour of a role (QAR/hour)
///
/// ```text
/// annual direct   = (salary + accommodation + transport) * 12
/// gratuity        = salary / 30 * leave settlement days
/// annual indirect = visa + flight + gratuity
/// rate            = (direct + indirect) / 2496
/// ```
pub fn effective_hourly_rate(costs: &ManpowerCosts) -> f64 {
    let monthly_direct = costs.monthly_salary + costs.accommodation + costs.transport;
    let annual_direct = monthly_direct * MONTHS_PER_YEAR;

    let gratuity_per_year =
        (costs.monthly_salary / SALARY_DAY_BASIS) * costs.leave_settlement_days_per_year;
    let annual_indirect =
        costs.visa_cost_per_year + costs.annual_flight_ticket_cost + gratuity_per_year;

    let total_annual_cost = annual_direct + annual_indirect;

    if ANNUAL_HOURS > 0.0 {
        total_annual_cost / ANNUAL_HOURS
    } else {
        0.0
    }
}

/// Editable cost component of a manpower rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManpowerField {
    MonthlySalary,
    Accommodation,
    Transport,
    VisaCostPerYear,
    AnnualFlightTicketCost,
    LeaveSettlementDaysPerYear,
}

/// A manpower role with its cost components and derived hourly rate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManpowerRate {
    pub id: RateId,
    pub role: String,
    #[serde(flatten)]
    costs: ManpowerCosts,
    effective_hourly_rate: f64,
    /// Manual figure that wins over the computed rate until a component changes
    hourly_rate_override: Option<f64>,
}

impl ManpowerRate {
    pub fn new(id: RateId, role: impl Into<String>, costs: ManpowerCosts) -> Self {
        let costs = costs.clamped();
        Self {
            id,
            role: role.into(),
            effective_hourly_rate: effective_hourly_rate(&costs),
            costs,
            hourly_rate_override: None,
        }
    }

    pub fn costs(&self) -> &ManpowerCosts {
        &self.costs
    }

    /// Rate used for costing: the manual override if one is set, else the computed rate
    pub fn effective_hourly_rate(&self) -> f64 {
        self.hourly_rate_override
            .unwrap_or(self.effective_hourly_rate)
    }

    /// The rate derived from the cost components, ignoring any override
    pub fn computed_hourly_rate(&self) -> f64 {
        self.effective_hourly_rate
    }

    pub fn has_override(&self) -> bool {
        self.hourly_rate_override.is_some()
    }

    /// Replace all cost components; recomputes the rate and drops any override
    pub fn set_costs(&mut self, costs: ManpowerCosts) {
        self.costs = costs.clamped();
        self.recompute();
    }

    /// Set a single cost component; recomputes the rate and drops any override
    pub fn update(&mut self, field: ManpowerField, value: f64) {
        self.costs.set(field, value);
        self.recompute();
    }

    /// Pin the hourly rate to a manual figure
    ///
    /// The override survives until a cost component is edited or
    /// `clear_override` is called.
    pub fn override_hourly_rate(&mut self, rate: f64) {
        self.hourly_rate_override = Some(clamp_amount(rate));
    }

    pub fn clear_override(&mut self) {
        self.hourly_rate_override = None;
    }

    fn recompute(&mut self) {
        self.effective_hourly_rate = effective_hourly_rate(&self.costs);
        self.hourly_rate_override = None;
    }
}

/// Hourly rate for a piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRate {
    pub id: RateId,
    pub item: String,
    pub hourly_rate: f64,
}

/// Unit price for a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRate {
    pub id: RateId,
    pub name: String,
    pub unit: String,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

/// A client and the markup applied to labour and plant rates when costing for them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: ClientId,
    pub name: String,
    /// Percentage, e.g. 10 for 10%
    pub markup_percentage: f64,
}

/// Owned store of all canonical rates and client profiles
#[derive(Debug, Clone, Default, Serialize)]
pub struct RateCatalog {
    manpower: Vec<ManpowerRate>,
    equipment: Vec<EquipmentRate>,
    materials: Vec<MaterialRate>,
    clients: Vec<ClientProfile>,
}

impl RateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with typical Doha rates
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        let roles = [
            ("Skilled Laborer / Mason", 2500.0, 300.0, 200.0, 500.0, 1200.0),
            ("General Helper", 1500.0, 250.0, 150.0, 500.0, 1000.0),
            ("Foreman", 4500.0, 500.0, 300.0, 750.0, 1800.0),
        ];
        for (role, salary, accommodation, transport, visa, flight) in roles {
            // Seeds are well-formed, the names are non-empty
            let _ = catalog.add_manpower(
                role,
                ManpowerCosts {
                    monthly_salary: salary,
                    accommodation,
                    transport,
                    visa_cost_per_year: visa,
                    annual_flight_ticket_cost: flight,
                    leave_settlement_days_per_year: 21.0,
                },
            );
        }

        for (item, rate) in [
            ("Excavator (20T)", 250.0),
            ("Concrete Mixer (1 bag)", 50.0),
            ("JCB / Backhoe Loader", 150.0),
            ("Dewatering Pump (4\")", 30.0),
        ] {
            let _ = catalog.add_equipment(item, rate);
        }

        for (name, unit, price, supplier) in [
            ("OPC Cement (50kg bag)", "bag", 16.0, "Qatar National Cement"),
            ("Dune Sand", "m³", 45.0, "Local Supplier"),
            ("Washed Sand", "m³", 60.0, "Local Supplier"),
            ("Aggregate (20mm)", "m³", 75.0, "Local Supplier"),
            ("Deformed Steel Bar (12mm)", "ton", 2400.0, "Qatar Steel"),
        ] {
            let _ = catalog.add_material(name, unit, price, Some(supplier.to_string()));
        }

        for (name, markup) in [
            ("Standard Client", 0.0),
            ("Premium Client (Ashghal)", 10.0),
            ("Private Villa Client", 5.0),
        ] {
            let _ = catalog.add_client(name, markup);
        }

        catalog
    }

    // === MANPOWER ===

    pub fn manpower(&self) -> &[ManpowerRate] {
        &self.manpower
    }

    pub fn manpower_rate(&self, id: RateId) -> Option<&ManpowerRate> {
        self.manpower.iter().find(|r| r.id == id)
    }

    pub fn manpower_rate_mut(&mut self, id: RateId) -> Option<&mut ManpowerRate> {
        self.manpower.iter_mut().find(|r| r.id == id)
    }

    /// Add a role; rejected when the role name is empty
    pub fn add_manpower(&mut self, role: &str, costs: ManpowerCosts) -> Result<RateId> {
        let role = role.trim();
        if role.is_empty() {
            return Err(EstimateError::InvalidInput("manpower role is empty".into()));
        }
        let id = RateId(next_id(self.manpower.iter().map(|r| r.id.0)));
        self.manpower.push(ManpowerRate::new(id, role, costs));
        Ok(id)
    }

    /// Edit one cost component of a role
    pub fn update_manpower(&mut self, id: RateId, field: ManpowerField, value: f64) -> Result<f64> {
        let rate = self
            .manpower_rate_mut(id)
            .ok_or(EstimateError::RateNotFound(id))?;
        rate.update(field, value);
        Ok(rate.effective_hourly_rate())
    }

    pub fn remove_manpower(&mut self, id: RateId) -> bool {
        let before = self.manpower.len();
        self.manpower.retain(|r| r.id != id);
        self.manpower.len() != before
    }

    // === EQUIPMENT ===

    pub fn equipment(&self) -> &[EquipmentRate] {
        &self.equipment
    }

    pub fn add_equipment(&mut self, item: &str, hourly_rate: f64) -> Result<RateId> {
        let item = item.trim();
        if item.is_empty() {
            return Err(EstimateError::InvalidInput("equipment item is empty".into()));
        }
        let id = RateId(next_id(self.equipment.iter().map(|r| r.id.0)));
        self.equipment.push(EquipmentRate {
            id,
            item: item.to_string(),
            hourly_rate: clamp_amount(hourly_rate),
        });
        Ok(id)
    }

    pub fn set_equipment_rate(&mut self, id: RateId, hourly_rate: f64) -> Result<()> {
        let rate = self
            .equipment
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(EstimateError::RateNotFound(id))?;
        rate.hourly_rate = clamp_amount(hourly_rate);
        Ok(())
    }

    pub fn remove_equipment(&mut self, id: RateId) -> bool {
        let before = self.equipment.len();
        self.equipment.retain(|r| r.id != id);
        self.equipment.len() != before
    }

    // === MATERIALS ===

    pub fn materials(&self) -> &[MaterialRate] {
        &self.materials
    }

    pub fn add_material(
        &mut self,
        name: &str,
        unit: &str,
        unit_price: f64,
        supplier: Option<String>,
    ) -> Result<RateId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EstimateError::InvalidInput("material name is empty".into()));
        }
        let id = RateId(next_id(self.materials.iter().map(|r| r.id.0)));
        self.materials.push(MaterialRate {
            id,
            name: name.to_string(),
            unit: unit.trim().to_string(),
            unit_price: clamp_amount(unit_price),
            supplier: supplier.filter(|s| !s.trim().is_empty()),
        });
        Ok(id)
    }

    pub fn set_material_price(&mut self, id: RateId, unit_price: f64) -> Result<()> {
        let rate = self
            .materials
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(EstimateError::RateNotFound(id))?;
        rate.unit_price = clamp_amount(unit_price);
        Ok(())
    }

    pub fn remove_material(&mut self, id: RateId) -> bool {
        let before = self.materials.len();
        self.materials.retain(|r| r.id != id);
        self.materials.len() != before
    }

    // === CLIENTS ===

    pub fn clients(&self) -> &[ClientProfile] {
        &self.clients
    }

    pub fn client(&self, id: ClientId) -> Option<&ClientProfile> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn add_client(&mut self, name: &str, markup_percentage: f64) -> Result<ClientId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EstimateError::InvalidInput("client name is empty".into()));
        }
        let id = ClientId(next_id(self.clients.iter().map(|c| c.id.0)));
        self.clients.push(ClientProfile {
            id,
            name: name.to_string(),
            markup_percentage: clamp_amount(markup_percentage),
        });
        Ok(id)
    }

    pub fn set_client_markup(&mut self, id: ClientId, markup_percentage: f64) -> Result<()> {
        let client = self
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EstimateError::ClientNotFound(id))?;
        client.markup_percentage = clamp_amount(markup_percentage);
        Ok(())
    }

    pub fn remove_client(&mut self, id: ClientId) -> bool {
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);
        self.clients.len() != before
    }

    // === LOADING ===

    /// Load a catalog from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::parse_toml(&content)?;
        tracing::info!(
            "Loaded rate catalog from {}: {} roles, {} equipment, {} materials, {} clients",
            path.display(),
            catalog.manpower.len(),
            catalog.equipment.len(),
            catalog.materials.len(),
            catalog.clients.len()
        );
        Ok(catalog)
    }

    /// Parse a catalog from a TOML string
    ///
    /// Any `effective_hourly_rate` present in the file is ignored; rates are
    /// always derived from the cost components.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: TomlCatalog =
            toml::from_str(content).map_err(|e| EstimateError::ConfigError(e.to_string()))?;

        let mut catalog = Self::new();
        for role in data.manpower {
            catalog.add_manpower(&role.role, role.costs())?;
        }
        for eq in data.equipment {
            catalog.add_equipment(&eq.item, eq.hourly_rate)?;
        }
        for m in data.materials {
            catalog.add_material(&m.name, &m.unit, m.unit_price, m.supplier)?;
        }
        for c in data.clients {
            catalog.add_client(&c.name, c.markup_percentage)?;
        }
        Ok(catalog)
    }
}

/// TOML representation of a catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    manpower: Vec<TomlManpower>,
    #[serde(default)]
    equipment: Vec<TomlEquipment>,
    #[serde(default)]
    materials: Vec<TomlMaterial>,
    #[serde(default)]
    clients: Vec<TomlClient>,
}

#[derive(Debug, Deserialize)]
struct TomlManpower {
    role: String,
    #[serde(default)]
    monthly_salary: f64,
    #[serde(default)]
    accommodation: f64,
    #[serde(default)]
    transport: f64,
    #[serde(default)]
    visa_cost_per_year: f64,
    #[serde(default)]
    annual_flight_ticket_cost: f64,
    #[serde(default = "default_leave_days")]
    leave_settlement_days_per_year: f64,
}

fn default_leave_days() -> f64 {
    21.0
}

impl TomlManpower {
    fn costs(&self) -> ManpowerCosts {
        ManpowerCosts {
            monthly_salary: self.monthly_salary,
            accommodation: self.accommodation,
            transport: self.transport,
            visa_cost_per_year: self.visa_cost_per_year,
            annual_flight_ticket_cost: self.annual_flight_ticket_cost,
            leave_settlement_days_per_year: self.leave_settlement_days_per_year,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlEquipment {
    item: String,
    hourly_rate: f64,
}

#[derive(Debug, Deserialize)]
struct TomlMaterial {
    name: String,
    #[serde(default)]
    unit: String,
    unit_price: f64,
    #[serde(default)]
    supplier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlClient {
    name: String,
    #[serde(default)]
    markup_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mason_costs() -> ManpowerCosts {
        ManpowerCosts {
            monthly_salary: 2500.0,
            accommodation: 300.0,
            transport: 200.0,
            visa_cost_per_year: 500.0,
            annual_flight_ticket_cost: 1200.0,
            leave_settlement_days_per_year: 21.0,
        }
    }

    #[test]
    fn test_annual_hours_constant() {
        assert_eq!(ANNUAL_HOURS, 2496.0);
    }

    #[test]
    fn test_effective_hourly_rate_worked_example() {
        // direct 36000, gratuity 1750, indirect 3450, total 39450
        let rate = effective_hourly_rate(&mason_costs());
        assert!((rate - 39450.0 / 2496.0).abs() < 1e-9);
        assert!((rate - 15.80).abs() < 0.01);
    }

    #[test]
    fn test_effective_hourly_rate_zero_inputs() {
        assert_eq!(effective_hourly_rate(&ManpowerCosts::default()), 0.0);
    }

    #[test]
    fn test_update_recomputes_rate() {
        let mut rate = ManpowerRate::new(RateId(1), "Mason", mason_costs());
        let before = rate.effective_hourly_rate();
        rate.update(ManpowerField::MonthlySalary, 3000.0);
        assert!(rate.effective_hourly_rate() > before);
        assert_eq!(
            rate.effective_hourly_rate(),
            effective_hourly_rate(rate.costs())
        );
    }

    #[test]
    fn test_update_clamps_negative() {
        let mut rate = ManpowerRate::new(RateId(1), "Mason", mason_costs());
        rate.update(ManpowerField::Transport, -50.0);
        assert_eq!(rate.costs().transport, 0.0);
    }

    #[test]
    fn test_override_cleared_by_component_edit() {
        let mut rate = ManpowerRate::new(RateId(1), "Mason", mason_costs());
        rate.override_hourly_rate(20.91);
        assert!(rate.has_override());
        assert_eq!(rate.effective_hourly_rate(), 20.91);
        assert!((rate.computed_hourly_rate() - 15.805).abs() < 0.01);

        rate.update(ManpowerField::Accommodation, 300.0);
        assert!(!rate.has_override());
        assert_eq!(rate.effective_hourly_rate(), rate.computed_hourly_rate());
    }

    #[test]
    fn test_defaults_recompute_seed_rates() {
        let catalog = RateCatalog::with_defaults();
        assert_eq!(catalog.manpower().len(), 3);
        assert_eq!(catalog.equipment().len(), 4);
        assert_eq!(catalog.materials().len(), 5);
        assert_eq!(catalog.clients().len(), 3);

        for rate in catalog.manpower() {
            assert_eq!(rate.effective_hourly_rate(), effective_hourly_rate(rate.costs()));
        }
        let mason = &catalog.manpower()[0];
        assert!((mason.effective_hourly_rate() - 15.80).abs() < 0.01);
    }

    #[test]
    fn test_add_assigns_max_plus_one() {
        let mut catalog = RateCatalog::with_defaults();
        assert!(catalog.remove_manpower(RateId(2)));
        let id = catalog.add_manpower("Steel Fixer", mason_costs()).unwrap();
        assert_eq!(id, RateId(4));
    }

    #[test]
    fn test_add_rejects_empty_names() {
        let mut catalog = RateCatalog::new();
        assert!(catalog.add_manpower("  ", mason_costs()).is_err());
        assert!(catalog.add_material("", "bag", 10.0, None).is_err());
        assert!(catalog.add_client("", 5.0).is_err());
        assert!(catalog.add_equipment("", 5.0).is_err());
    }

    #[test]
    fn test_update_manpower_unknown_id() {
        let mut catalog = RateCatalog::new();
        let result = catalog.update_manpower(RateId(9), ManpowerField::Transport, 1.0);
        assert!(matches!(result, Err(EstimateError::RateNotFound(RateId(9)))));
    }

    #[test]
    fn test_parse_toml_catalog() {
        let catalog = RateCatalog::parse_toml(
            r#"
            [[manpower]]
            role = "Mason"
            monthly_salary = 2500
            accommodation = 300
            transport = 200
            visa_cost_per_year = 500
            annual_flight_ticket_cost = 1200
            effective_hourly_rate = 99.0

            [[equipment]]
            item = "Excavator (20T)"
            hourly_rate = 250

            [[materials]]
            name = "Dune Sand"
            unit = "m³"
            unit_price = 45

            [[clients]]
            name = "Premium"
            markup_percentage = 10
            "#,
        )
        .unwrap();

        let mason = &catalog.manpower()[0];
        assert_eq!(mason.costs().leave_settlement_days_per_year, 21.0);
        assert!((mason.effective_hourly_rate() - 15.80).abs() < 0.01);
        assert_eq!(catalog.equipment()[0].hourly_rate, 250.0);
        assert_eq!(catalog.materials()[0].supplier, None);
        assert_eq!(catalog.clients()[0].markup_percentage, 10.0);
    }

    #[test]
    fn test_parse_toml_rejects_empty_role() {
        let result = RateCatalog::parse_toml("[[manpower]]\nrole = \"\"\n");
        assert!(matches!(result, Err(EstimateError::InvalidInput(_))));
    }
}
