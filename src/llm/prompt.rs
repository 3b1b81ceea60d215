//! Costing prompt construction
//!
//! The prompt hands the generator the marked-up rates of the current pass
//! and every piece of project context, most important first.

use crate::rates::CostingRates;
use std::fmt::Write as _;

/// Everything a proposal generator needs to cost one item
#[derive(Debug, Clone, Default)]
pub struct CostingRequest {
    pub description: String,
    pub item_notes: String,
    pub general_notes: String,
    pub scope_of_work: String,
    /// Marked-up manpower and equipment rates, raw material rates
    pub rates: CostingRates,
}

/// Rate list section, amounts with 2 decimals
pub fn render_rates(rates: &CostingRates) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "PRE-DEFINED RATES (use these exact rates in your calculations):");

    let _ = writeln!(out, "\nManpower (QAR/hr):");
    for r in &rates.manpower {
        let _ = writeln!(out, "- {}: {:.2}", r.role, r.hourly_rate);
    }

    let _ = writeln!(out, "\nEquipment (QAR/hr):");
    for r in &rates.equipment {
        let _ = writeln!(out, "- {}: {:.2}", r.item, r.hourly_rate);
    }

    let _ = writeln!(out, "\nMaterials (QAR):");
    for m in &rates.materials {
        let _ = writeln!(out, "- {}: {:.2} per {}", m.name, m.unit_price, m.unit);
    }

    let _ = writeln!(
        out,
        "\nIf a role, equipment item, or material the task needs is NOT in this list, \
         estimate its rate from the Doha, Qatar market. For everything IN this list \
         you MUST use the given rate."
    );
    out
}

fn or_fallback<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() {
        fallback
    } else {
        text
    }
}

/// User prompt for one costing pass
pub fn render_prompt(request: &CostingRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Analyze the following construction work description. Use all context below, \
         in order of importance: scope of work, general project notes, item notes, \
         pre-defined rates."
    );
    let _ = writeln!(out, "\n---\n{}---", render_rates(&request.rates));
    let _ = writeln!(
        out,
        "Project Scope of Work:\n{}\n---",
        or_fallback(&request.scope_of_work, "Not provided")
    );
    let _ = writeln!(
        out,
        "General Project Notes:\n{}\n---",
        or_fallback(&request.general_notes, "None")
    );
    let _ = writeln!(
        out,
        "Item-Specific Notes:\n{}\n---",
        or_fallback(&request.item_notes, "None")
    );
    let _ = writeln!(out, "Work Description:\n\"{}\"\n---", request.description);
    out
}

/// System prompt for costing: role, output contract, and JSON shape
pub const COSTING_SYSTEM_PROMPT: &str = r#"You are a quantity surveyor pricing construction work in Doha, Qatar.
For the work item you are given, provide:
1. The typical manpower required (e.g. "1 Mason, 2 Helpers").
2. The standard measurement unit (e.g. m³, m², kg).
3. A high-level work category (e.g. "Earthworks", "Concrete Works", "MEP", "Finishing").
4. A detailed breakdown of the unit price (BSR) in QAR for ONE unit of work.
5. A suggested overhead percentage and profit percentage.

All costs are in QAR. Material cost = quantity * unitPrice. Labor and equipment cost = hours * rate.

OUTPUT FORMAT (a single JSON object, no explanation):
{
  "manpower": "1 Mason, 2 Helpers",
  "unit": "m²",
  "category": "Masonry",
  "rateBreakdown": {
    "materials": [{"item": "...", "unit": "...", "quantity": 0.0, "unitPrice": 0.0, "cost": 0.0}],
    "labor": [{"role": "...", "hours": 0.0, "rate": 0.0, "cost": 0.0}],
    "equipment": [{"item": "...", "hours": 0.0, "rate": 0.0, "cost": 0.0}],
    "tools": [{"item": "...", "cost": 0.0}],
    "overhead": {"percentage": 10},
    "profit": {"percentage": 15}
  }
}
"#;
