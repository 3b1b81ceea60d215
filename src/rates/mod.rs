//! Rate layer - canonical catalog rates and client markup

pub mod catalog;
pub mod markup;

pub use catalog::{
    effective_hourly_rate, ClientProfile, EquipmentRate, ManpowerCosts, ManpowerField,
    ManpowerRate, MaterialRate, RateCatalog, ANNUAL_HOURS,
};
pub use markup::{apply_markup, markup_factor, CostingRates, RoleRate};
