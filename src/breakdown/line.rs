//! Cost lines - the rows of a rate breakdown
//!
//! Material rows cost `quantity * unit_price`, labour and equipment rows cost
//! `hours * rate`, tool rows carry a directly entered cost.

use crate::core::error::{EstimateError, Result};
use crate::core::types::clamp_amount;
use serde::{Deserialize, Serialize};

/// The four row sections of a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Materials,
    Labor,
    Equipment,
    Tools,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Materials,
        Section::Labor,
        Section::Equipment,
        Section::Tools,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Materials => "materials",
            Section::Labor => "labor",
            Section::Equipment => "equipment",
            Section::Tools => "tools",
        }
    }
}

/// A single-field edit to a row
///
/// `Label` targets the row's description (`item`, or `role` for labour).
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    Label(String),
    Unit(String),
    Quantity(f64),
    UnitPrice(f64),
    Hours(f64),
    Rate(f64),
    Cost(f64),
}

impl RowEdit {
    fn field_name(&self) -> &'static str {
        match self {
            RowEdit::Label(_) => "label",
            RowEdit::Unit(_) => "unit",
            RowEdit::Quantity(_) => "quantity",
            RowEdit::UnitPrice(_) => "unit price",
            RowEdit::Hours(_) => "hours",
            RowEdit::Rate(_) => "rate",
            RowEdit::Cost(_) => "cost",
        }
    }
}

fn unsupported(section: Section, edit: &RowEdit) -> EstimateError {
    EstimateError::InvalidEdit(format!(
        "{} rows have no editable {}",
        section.name(),
        edit.field_name()
    ))
}

/// Cost of a material row
pub fn material_cost(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Cost of a labour or equipment row
pub fn time_cost(hours: f64, rate: f64) -> f64 {
    hours * rate
}

/// Common behaviour of breakdown rows
pub trait CostLine {
    fn cost(&self) -> f64;

    /// Re-derive the cost from the row's inputs
    fn recompute(&mut self);

    /// Apply a single-field edit, re-deriving the cost when an input changed
    fn apply(&mut self, edit: RowEdit) -> Result<()>;

    /// Numeric fields that are negative or not finite
    fn invalid_fields(&self) -> Vec<&'static str>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    pub item: String,
    #[serde(default)]
    pub unit: String,
    pub quantity: f64,
    #[serde(alias = "unit_price")]
    pub unit_price: f64,
    #[serde(default)]
    pub cost: f64,
}

impl MaterialLine {
    pub fn new(item: impl Into<String>, unit: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            item: item.into(),
            unit: unit.into(),
            quantity,
            unit_price,
            cost: material_cost(quantity, unit_price),
        }
    }
}

impl Default for MaterialLine {
    /// New material rows start at quantity 1
    fn default() -> Self {
        Self::new("", "", 1.0, 0.0)
    }
}

impl CostLine for MaterialLine {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn recompute(&mut self) {
        self.cost = material_cost(self.quantity, self.unit_price);
    }

    fn apply(&mut self, edit: RowEdit) -> Result<()> {
        match edit {
            RowEdit::Label(item) => self.item = item,
            RowEdit::Unit(unit) => self.unit = unit,
            RowEdit::Quantity(v) => self.quantity = clamp_amount(v),
            RowEdit::UnitPrice(v) => self.unit_price = clamp_amount(v),
            other => return Err(unsupported(Section::Materials, &other)),
        }
        self.recompute();
        Ok(())
    }

    fn invalid_fields(&self) -> Vec<&'static str> {
        invalid(&[("quantity", self.quantity), ("unitPrice", self.unit_price)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborLine {
    pub role: String,
    pub hours: f64,
    pub rate: f64,
    #[serde(default)]
    pub cost: f64,
}

impl LaborLine {
    pub fn new(role: impl Into<String>, hours: f64, rate: f64) -> Self {
        Self {
            role: role.into(),
            hours,
            rate,
            cost: time_cost(hours, rate),
        }
    }
}

impl CostLine for LaborLine {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn recompute(&mut self) {
        self.cost = time_cost(self.hours, self.rate);
    }

    fn apply(&mut self, edit: RowEdit) -> Result<()> {
        match edit {
            RowEdit::Label(role) => self.role = role,
            RowEdit::Hours(v) => self.hours = clamp_amount(v),
            RowEdit::Rate(v) => self.rate = clamp_amount(v),
            other => return Err(unsupported(Section::Labor, &other)),
        }
        self.recompute();
        Ok(())
    }

    fn invalid_fields(&self) -> Vec<&'static str> {
        invalid(&[("hours", self.hours), ("rate", self.rate)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentLine {
    pub item: String,
    pub hours: f64,
    pub rate: f64,
    #[serde(default)]
    pub cost: f64,
}

impl EquipmentLine {
    pub fn new(item: impl Into<String>, hours: f64, rate: f64) -> Self {
        Self {
            item: item.into(),
            hours,
            rate,
            cost: time_cost(hours, rate),
        }
    }
}

impl CostLine for EquipmentLine {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn recompute(&mut self) {
        self.cost = time_cost(self.hours, self.rate);
    }

    fn apply(&mut self, edit: RowEdit) -> Result<()> {
        match edit {
            RowEdit::Label(item) => self.item = item,
            RowEdit::Hours(v) => self.hours = clamp_amount(v),
            RowEdit::Rate(v) => self.rate = clamp_amount(v),
            other => return Err(unsupported(Section::Equipment, &other)),
        }
        self.recompute();
        Ok(())
    }

    fn invalid_fields(&self) -> Vec<&'static str> {
        invalid(&[("hours", self.hours), ("rate", self.rate)])
    }
}

/// Tools and small plant: a lump-sum cost per unit of work
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolLine {
    pub item: String,
    pub cost: f64,
}

impl ToolLine {
    pub fn new(item: impl Into<String>, cost: f64) -> Self {
        Self {
            item: item.into(),
            cost,
        }
    }
}

impl CostLine for ToolLine {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn recompute(&mut self) {}

    fn apply(&mut self, edit: RowEdit) -> Result<()> {
        match edit {
            RowEdit::Label(item) => self.item = item,
            RowEdit::Cost(v) => self.cost = clamp_amount(v),
            other => return Err(unsupported(Section::Tools, &other)),
        }
        Ok(())
    }

    fn invalid_fields(&self) -> Vec<&'static str> {
        invalid(&[("cost", self.cost)])
    }
}

fn invalid(fields: &[(&'static str, f64)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, v)| !v.is_finite() || *v < 0.0)
        .map(|(name, _)| *name)
        .collect()
}

/// Sum of row costs, in row order
pub fn section_total<L: CostLine>(lines: &[L]) -> f64 {
    lines.iter().fold(0.0, |acc, l| acc + l.cost())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_cost_derived() {
        let mut line = MaterialLine::new("Cement", "bag", 7.0, 16.0);
        assert_eq!(line.cost, 112.0);

        line.apply(RowEdit::Quantity(10.0)).unwrap();
        assert_eq!(line.cost, 160.0);

        line.apply(RowEdit::UnitPrice(20.0)).unwrap();
        assert_eq!(line.cost, 200.0);
    }

    #[test]
    fn test_material_rejects_direct_cost() {
        let mut line = MaterialLine::new("Cement", "bag", 7.0, 16.0);
        let result = line.apply(RowEdit::Cost(5.0));
        assert!(matches!(result, Err(EstimateError::InvalidEdit(_))));
        assert_eq!(line.cost, 112.0);
    }

    #[test]
    fn test_material_default_quantity_one() {
        let line = MaterialLine::default();
        assert_eq!(line.quantity, 1.0);
        assert_eq!(line.cost, 0.0);
    }

    #[test]
    fn test_labor_cost_derived() {
        let mut line = LaborLine::new("Mason", 2.0, 15.8);
        assert!((line.cost - 31.6).abs() < 1e-9);

        line.apply(RowEdit::Hours(4.0)).unwrap();
        assert!((line.cost - 63.2).abs() < 1e-9);

        line.apply(RowEdit::Label("Foreman".into())).unwrap();
        assert_eq!(line.role, "Foreman");
    }

    #[test]
    fn test_labor_rejects_unit() {
        let mut line = LaborLine::new("Mason", 2.0, 15.8);
        assert!(line.apply(RowEdit::Unit("hr".into())).is_err());
    }

    #[test]
    fn test_equipment_cost_derived() {
        let mut line = EquipmentLine::new("Mixer", 0.5, 50.0);
        assert_eq!(line.cost, 25.0);
        line.apply(RowEdit::Rate(60.0)).unwrap();
        assert_eq!(line.cost, 30.0);
    }

    #[test]
    fn test_tool_cost_direct() {
        let mut line = ToolLine::new("Trowels", 5.0);
        line.recompute();
        assert_eq!(line.cost, 5.0);
        line.apply(RowEdit::Cost(7.5)).unwrap();
        assert_eq!(line.cost, 7.5);
        assert!(line.apply(RowEdit::Hours(1.0)).is_err());
    }

    #[test]
    fn test_negative_edit_clamped() {
        let mut line = EquipmentLine::new("Mixer", 1.0, 50.0);
        line.apply(RowEdit::Hours(-3.0)).unwrap();
        assert_eq!(line.hours, 0.0);
        assert_eq!(line.cost, 0.0);
    }

    #[test]
    fn test_invalid_fields() {
        let line = MaterialLine {
            item: "Sand".into(),
            unit: "m³".into(),
            quantity: -1.0,
            unit_price: f64::NAN,
            cost: 0.0,
        };
        assert_eq!(line.invalid_fields(), vec!["quantity", "unitPrice"]);
        assert!(ToolLine::new("Saw", 3.0).invalid_fields().is_empty());
    }

    #[test]
    fn test_recompute_overrides_stale_cost() {
        let mut line = LaborLine {
            role: "Helper".into(),
            hours: 3.0,
            rate: 10.0,
            cost: 999.0,
        };
        line.recompute();
        assert_eq!(line.cost, 30.0);
    }

    #[test]
    fn test_section_total() {
        let lines = vec![ToolLine::new("a", 1.5), ToolLine::new("b", 2.5)];
        assert_eq!(section_total(&lines), 4.0);
        assert_eq!(section_total::<ToolLine>(&[]), 0.0);
        assert!(section_total::<ToolLine>(&[]).is_sign_positive());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"item": "Sand", "unit": "m³", "quantity": 2, "unitPrice": 45, "cost": 90}"#;
        let line: MaterialLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.unit_price, 45.0);
        assert_eq!(line.cost, 90.0);
    }
}
