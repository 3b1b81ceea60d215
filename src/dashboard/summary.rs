//! Dashboard summary and its text/JSON renderings

use crate::boq::BoqItem;
use crate::dashboard::rollup::{
    cost_breakdown, cost_by_category, manpower_roles, total_cost, total_dry_cost, CostBreakdown,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// All dashboard aggregates, computed together from one item list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub item_count: usize,
    pub total_cost: f64,
    pub total_dry_cost: f64,
    pub cost_breakdown: CostBreakdown,
    pub cost_by_category: BTreeMap<String, f64>,
    pub manpower_roles: Vec<String>,
}

pub fn summarize(items: &[BoqItem], default_category: &str) -> DashboardSummary {
    DashboardSummary {
        item_count: items.len(),
        total_cost: total_cost(items),
        total_dry_cost: total_dry_cost(items),
        cost_breakdown: cost_breakdown(items),
        cost_by_category: cost_by_category(items, default_category),
        manpower_roles: manpower_roles(items),
    }
}

impl DashboardSummary {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Plain-text report, amounts in QAR with 2 decimals
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Items:          {}", self.item_count);
        let _ = writeln!(out, "Total cost:     {:.2} QAR", self.total_cost);
        let _ = writeln!(out, "Total dry cost: {:.2} QAR", self.total_dry_cost);

        if self.cost_breakdown.has_cost_data() {
            let _ = writeln!(out, "\nCost by type:");
            let shares: BTreeMap<&str, f64> = self
                .cost_breakdown
                .shares()
                .into_iter()
                .map(|(t, s)| (t.label(), s))
                .collect();
            for (cost_type, amount) in self.cost_breakdown.iter() {
                let share = shares.get(cost_type.label()).copied().unwrap_or(0.0);
                let _ = writeln!(
                    out,
                    "  {:<10} {:>14.2}  {:>5.1}%",
                    cost_type.label(),
                    amount,
                    share * 100.0
                );
            }
        }

        if !self.cost_by_category.is_empty() {
            let _ = writeln!(out, "\nCost by category:");
            for (category, amount) in &self.cost_by_category {
                let _ = writeln!(out, "  {:<24} {:>14.2}", category, amount);
            }
        }

        if !self.manpower_roles.is_empty() {
            let _ = writeln!(out, "\nManpower: {}", self.manpower_roles.join(", "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boq::{BoqSheet, ItemField};
    use crate::breakdown::{BreakdownDraft, PercentageInput, RateBreakdown, ToolLine};
    use crate::core::config::RoundingPolicy;

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[], "Uncategorized");
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.total_cost, 0.0);
        assert!(summary.total_cost.is_sign_positive());
        assert!(summary.total_dry_cost.is_sign_positive());
        assert!(!summary.render().contains("-0.00"));
        assert!(summary.to_json().contains("\"totalCost\": 0.0"));
        assert!(summary.render().contains("Total cost:     0.00 QAR"));
        assert!(!summary.render().contains("Cost by type"));
    }

    #[test]
    fn test_summarize_and_render() {
        let mut sheet = BoqSheet::new();
        let id = sheet.add_item();
        sheet.update_field(id, ItemField::Quantity(4.0)).unwrap();
        sheet
            .update_field(id, ItemField::Manpower("Carpenter".into()))
            .unwrap();
        let draft = BreakdownDraft {
            tools: vec![ToolLine::new("Formwork hire", 25.0)],
            overhead: PercentageInput { percentage: 0.0 },
            profit: PercentageInput { percentage: 0.0 },
            ..Default::default()
        };
        let bsr = RateBreakdown::from_draft(draft, RoundingPolicy::HalfUp).unwrap();
        sheet.accept_breakdown(id, bsr).unwrap();

        let summary = summarize(sheet.items(), "Uncategorized");
        assert_eq!(summary.total_cost, 100.0);
        assert_eq!(summary.cost_by_category.get("Uncategorized"), Some(&100.0));

        let text = summary.render();
        assert!(text.contains("Tools"));
        assert!(text.contains("100.0%"));
        assert!(text.contains("Manpower: Carpenter"));

        let json: serde_json::Value = serde_json::from_str(&summary.to_json()).unwrap();
        assert_eq!(json["totalCost"], 100.0);
        assert_eq!(json["costByCategory"]["Uncategorized"], 100.0);
    }
}
