//! Project session - the owned store every engine operation works against
//!
//! Holds the rate catalog, the active client, the BOQ sheet and the project
//! metadata. Costing passes are split into `begin_costing` (mark loading,
//! build the request) and `complete_costing` (accept or fail) so the sheet
//! stays editable while a proposal is in flight.

use crate::boq::{BoqSheet, ItemStatus};
use crate::core::config::EstimatorConfig;
use crate::core::error::{EstimateError, Result};
use crate::core::types::{ClientId, ItemId};
use crate::dashboard::{summarize, DashboardSummary};
use crate::export::ExportTable;
use crate::llm::{CostingRequest, Proposal, ProposalGenerator};
use crate::rates::{apply_markup, ClientProfile, CostingRates, RateCatalog};

/// Default project duration in days
pub const DEFAULT_DURATION_DAYS: u32 = 180;

/// Outcome of a sequential multi-item costing run
#[derive(Debug, Default)]
pub struct BulkCostingReport {
    pub succeeded: Vec<ItemId>,
    pub failed: Vec<(ItemId, EstimateError)>,
}

impl BulkCostingReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ProjectSession {
    config: EstimatorConfig,
    catalog: RateCatalog,
    active_client: Option<ClientId>,
    sheet: BoqSheet,
    pub project_name: String,
    pub client_name: String,
    pub general_notes: String,
    pub scope_of_work: String,
    pub duration_days: u32,
}

impl ProjectSession {
    pub fn new(config: EstimatorConfig, catalog: RateCatalog) -> Self {
        let active_client = config.default_client;
        Self {
            config,
            catalog,
            active_client,
            sheet: BoqSheet::new(),
            project_name: String::new(),
            client_name: String::new(),
            general_notes: String::new(),
            scope_of_work: String::new(),
            duration_days: DEFAULT_DURATION_DAYS,
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RateCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut RateCatalog {
        &mut self.catalog
    }

    pub fn sheet(&self) -> &BoqSheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut BoqSheet {
        &mut self.sheet
    }

    /// The client whose markup applies to costing passes
    ///
    /// Falls back to the first profile when none is set or the set one was
    /// removed. `None` only when the catalog has no profiles at all.
    pub fn active_client(&self) -> Option<&ClientProfile> {
        self.active_client
            .and_then(|id| self.catalog.client(id))
            .or_else(|| self.catalog.clients().first())
    }

    pub fn set_active_client(&mut self, id: ClientId) -> Result<()> {
        if self.catalog.client(id).is_none() {
            return Err(EstimateError::ClientNotFound(id));
        }
        self.active_client = Some(id);
        Ok(())
    }

    /// Marked-up rates for a costing pass under the active client
    pub fn costing_rates(&self) -> CostingRates {
        apply_markup(&self.catalog, self.active_client())
    }

    /// Start a costing pass: validate the item, mark it loading, build the request
    ///
    /// An item with an empty description is rejected and left untouched.
    pub fn begin_costing(&mut self, id: ItemId) -> Result<CostingRequest> {
        let item = self.sheet.costable_item(id)?;
        let request = CostingRequest {
            description: item.description().to_string(),
            item_notes: item.notes().to_string(),
            general_notes: self.general_notes.clone(),
            scope_of_work: self.scope_of_work.clone(),
            rates: self.costing_rates(),
        };
        self.sheet.set_status(id, ItemStatus::Loading)?;

        tracing::info!(
            "Costing item {} under {}",
            id,
            self.active_client().map(|c| c.name.as_str()).unwrap_or("no client")
        );
        Ok(request)
    }

    /// Finish a costing pass with the generator's outcome
    ///
    /// A valid proposal overwrites the item's breakdown, unit price, total,
    /// manpower, unit and category, whatever was edited meanwhile. Any failure
    /// (generator error or invalid proposal) sets the status to error and
    /// leaves every other field as it was.
    pub fn complete_costing(&mut self, id: ItemId, outcome: Result<Proposal>) -> Result<()> {
        let accepted = outcome
            .and_then(|proposal| proposal.into_parts(self.config.rounding))
            .and_then(|(text, breakdown)| self.sheet.accept_proposal(id, text, breakdown));

        match accepted {
            Ok(()) => {
                if let Some(item) = self.sheet.get(id) {
                    tracing::info!(
                        "Costed item {}: {:.2} per {} ({:.2} total)",
                        id,
                        item.unit_price(),
                        item.unit(),
                        item.total()
                    );
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Costing item {} failed: {}", id, e);
                // The item may have been removed while the pass was in flight
                let _ = self.sheet.set_status(id, ItemStatus::Error);
                Err(e)
            }
        }
    }

    /// One complete costing pass for one item
    pub async fn run_costing<G: ProposalGenerator>(&mut self, id: ItemId, generator: &G) -> Result<()> {
        let request = self.begin_costing(id)?;
        let outcome = generator.propose(&request).await;
        self.complete_costing(id, outcome)
    }

    /// Cost several items one after another
    ///
    /// Each item gets its own pass; a failure is recorded and the run moves on.
    pub async fn run_bulk_costing<G: ProposalGenerator>(
        &mut self,
        ids: &[ItemId],
        generator: &G,
    ) -> BulkCostingReport {
        let mut report = BulkCostingReport::default();
        for &id in ids {
            match self.run_costing(id, generator).await {
                Ok(()) => report.succeeded.push(id),
                Err(e) => report.failed.push((id, e)),
            }
        }
        tracing::info!(
            "Bulk costing finished: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }

    pub fn dashboard(&self) -> DashboardSummary {
        summarize(self.sheet.items(), &self.config.default_category)
    }

    pub fn export_table(&self) -> ExportTable {
        ExportTable::from_items(&self.project_name, &self.client_name, self.sheet.items())
    }
}
