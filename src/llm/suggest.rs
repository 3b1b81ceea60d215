//! Catalog assist: ask the LLM for typical market figures
//!
//! Suggestions are returned to the caller, never written into the catalog
//! here. A failed suggestion leaves nothing changed.

use crate::core::error::{EstimateError, Result};
use crate::core::types::clamp_amount;
use crate::llm::client::Completion;
use crate::llm::proposal::extract_json;
use crate::rates::ManpowerCosts;
use serde::Deserialize;

const SUGGEST_SYSTEM_PROMPT: &str = "You are a construction cost consultant in Doha, Qatar. \
Answer with a single, clean JSON object and nothing else.";

/// Gratuity accrual days per year, standard in Qatar
pub const DEFAULT_GRATUITY_DAYS: f64 = 21.0;

/// Unit and price suggested for a material
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSuggestion {
    pub unit: String,
    pub unit_price: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManpowerReply {
    monthly_salary: f64,
    accommodation: f64,
    transport: f64,
    visa_cost_per_year: f64,
    annual_flight_ticket_cost: f64,
    #[serde(default)]
    leave_settlement_days_per_year: Option<f64>,
}

fn manpower_prompt(role: &str) -> String {
    format!(
        "For a \"{role}\" in the construction industry in Doha, Qatar, provide a typical \
         monthly and yearly cost breakdown as JSON with these numeric fields:\n\
         monthlySalary: typical basic monthly salary in QAR\n\
         accommodation: monthly allowance for shared accommodation\n\
         transport: monthly allowance for transport to and from sites\n\
         visaCostPerYear: visa renewal cost averaged per year\n\
         annualFlightTicketCost: yearly flight ticket home\n\
         leaveSettlementDaysPerYear: days of basic salary accrued as end-of-service \
         gratuity per year (standard is 21)"
    )
}

fn material_prompt(name: &str) -> String {
    format!(
        "For the construction material \"{name}\" in Doha, Qatar, provide as JSON:\n\
         unit: the standard measurement unit (e.g. bag, m³, ton, kg)\n\
         unitPrice: a typical market price for that unit in QAR"
    )
}

/// Parse a manpower cost reply; components are clamped to >= 0
pub fn parse_manpower_costs(response: &str) -> Result<ManpowerCosts> {
    let reply: ManpowerReply = serde_json::from_str(extract_json(response)?)
        .map_err(|e| EstimateError::LlmError(format!("Invalid manpower suggestion: {}", e)))?;
    let costs = ManpowerCosts {
        monthly_salary: reply.monthly_salary,
        accommodation: reply.accommodation,
        transport: reply.transport,
        visa_cost_per_year: reply.visa_cost_per_year,
        annual_flight_ticket_cost: reply.annual_flight_ticket_cost,
        leave_settlement_days_per_year: reply
            .leave_settlement_days_per_year
            .unwrap_or(DEFAULT_GRATUITY_DAYS),
    };
    Ok(costs.clamped())
}

pub fn parse_material(response: &str) -> Result<MaterialSuggestion> {
    let mut suggestion: MaterialSuggestion = serde_json::from_str(extract_json(response)?)
        .map_err(|e| EstimateError::LlmError(format!("Invalid material suggestion: {}", e)))?;
    suggestion.unit_price = clamp_amount(suggestion.unit_price);
    Ok(suggestion)
}

/// Suggest the six cost components for a manpower role
pub async fn suggest_manpower_costs<C: Completion>(client: &C, role: &str) -> Result<ManpowerCosts> {
    if role.trim().is_empty() {
        return Err(EstimateError::InvalidInput("role name is empty".into()));
    }
    let response = client.complete(SUGGEST_SYSTEM_PROMPT, &manpower_prompt(role)).await?;
    parse_manpower_costs(&response)
}

/// Suggest a unit and unit price for a material
pub async fn suggest_material<C: Completion>(client: &C, name: &str) -> Result<MaterialSuggestion> {
    if name.trim().is_empty() {
        return Err(EstimateError::InvalidInput("material name is empty".into()));
    }
    let response = client.complete(SUGGEST_SYSTEM_PROMPT, &material_prompt(name)).await?;
    parse_material(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::effective_hourly_rate;

    struct Canned(&'static str);

    impl Completion for Canned {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_parse_manpower_costs() {
        let reply = r#"{"monthlySalary": 2500, "accommodation": 300, "transport": 200,
            "visaCostPerYear": 500, "annualFlightTicketCost": 1200, "leaveSettlementDaysPerYear": 21}"#;
        let costs = parse_manpower_costs(reply).unwrap();
        assert!((effective_hourly_rate(&costs) - 39450.0 / 2496.0).abs() < 1e-9);
    }

    #[test]
    fn test_gratuity_days_default() {
        let reply = r#"{"monthlySalary": 1500, "accommodation": 250, "transport": 150,
            "visaCostPerYear": 500, "annualFlightTicketCost": -10}"#;
        let costs = parse_manpower_costs(reply).unwrap();
        assert_eq!(costs.leave_settlement_days_per_year, 21.0);
        assert_eq!(costs.annual_flight_ticket_cost, 0.0);
    }

    #[test]
    fn test_parse_material() {
        let s = parse_material(r#"```json {"unit": "bag", "unitPrice": 16.5} ```"#).unwrap();
        assert_eq!(s.unit, "bag");
        assert_eq!(s.unit_price, 16.5);
        assert!(parse_material(r#"{"unit": "bag"}"#).is_err());
    }

    #[tokio::test]
    async fn test_suggest_rejects_empty_name() {
        let client = Canned("{}");
        assert!(matches!(
            suggest_material(&client, "  ").await,
            Err(EstimateError::InvalidInput(_))
        ));
        assert!(suggest_manpower_costs(&client, "").await.is_err());
    }

    #[tokio::test]
    async fn test_suggest_material_via_client() {
        let client = Canned(r#"{"unit": "m³", "unitPrice": 60}"#);
        let s = suggest_material(&client, "Washed Sand").await.unwrap();
        assert_eq!(s.unit, "m³");
        assert_eq!(s.unit_price, 60.0);
    }
}
