//! BOQ export table
//!
//! Built from the sheet's authoritative unit prices and totals; rendered as
//! JSON or as a fixed-width text table.

use crate::boq::BoqItem;
use serde::Serialize;
use std::fmt::Write as _;

pub const COLUMNS: [&str; 7] = [
    "S.No.",
    "Description of Work",
    "Unit",
    "Quantity",
    "Manpower",
    "Unit Price (QAR)",
    "Total Amount (QAR)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    /// 1-based position on the sheet
    pub serial: usize,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    pub manpower: String,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTable {
    pub project_name: String,
    pub client_name: String,
    pub rows: Vec<ExportRow>,
}

impl ExportTable {
    pub fn from_items(project_name: &str, client_name: &str, items: &[BoqItem]) -> Self {
        let rows = items
            .iter()
            .enumerate()
            .map(|(i, item)| ExportRow {
                serial: i + 1,
                description: item.description().to_string(),
                unit: item.unit().to_string(),
                quantity: item.quantity(),
                manpower: item.manpower().to_string(),
                unit_price: item.unit_price(),
                total: item.total(),
            })
            .collect();

        Self {
            project_name: project_name.to_string(),
            client_name: client_name.to_string(),
            rows,
        }
    }

    pub fn grand_total(&self) -> f64 {
        self.rows.iter().fold(0.0, |acc, r| acc + r.total)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Project Name: {}", self.project_name);
        let _ = writeln!(out, "Client Name:  {}", self.client_name);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<6} {:<40} {:<6} {:>10} {:<24} {:>16} {:>18}",
            COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4], COLUMNS[5], COLUMNS[6]
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<6} {:<40} {:<6} {:>10.2} {:<24} {:>16.2} {:>18.2}",
                row.serial,
                row.description,
                row.unit,
                row.quantity,
                row.manpower,
                row.unit_price,
                row.total
            );
        }
        let _ = writeln!(out, "{:>127.2}", self.grand_total());
        out
    }
}
