//! Costing proposals - the generator seam and response parsing
//!
//! A proposal is accepted all-or-nothing: it is parsed, validated, and turned
//! into a `RateBreakdown` before anything on the sheet is touched.

use crate::boq::ProposalText;
use crate::breakdown::{BreakdownDraft, RateBreakdown};
use crate::core::config::RoundingPolicy;
use crate::core::error::{EstimateError, Result};
use crate::llm::client::Completion;
use crate::llm::prompt::{render_prompt, CostingRequest, COSTING_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

/// A candidate costing for one item, as returned by a generator
///
/// Row costs and percentages only; subtotal, amounts, total and the quoted
/// price are derived on acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub manpower: String,
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
    pub rate_breakdown: BreakdownDraft,
}

impl Proposal {
    /// Validate and derive: the text fields plus a consistent breakdown
    pub fn into_parts(self, rounding: RoundingPolicy) -> Result<(ProposalText, RateBreakdown)> {
        let breakdown = RateBreakdown::from_draft(self.rate_breakdown, rounding)?;
        let text = ProposalText {
            manpower: self.manpower,
            unit: self.unit,
            category: self.category,
        };
        Ok((text, breakdown))
    }
}

/// Source of costing proposals
#[allow(async_fn_in_trait)]
pub trait ProposalGenerator {
    async fn propose(&self, request: &CostingRequest) -> Result<Proposal>;
}

/// Extract the JSON object from an LLM response (handles surrounding text)
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| EstimateError::MalformedProposal("No JSON found in response".into()))?;
    let end = response.rfind('}').ok_or_else(|| {
        EstimateError::MalformedProposal("No closing brace found in response".into())
    })?;
    if end < start {
        return Err(EstimateError::MalformedProposal(
            "No JSON object found in response".into(),
        ));
    }
    Ok(&response[start..=end])
}

/// Parse a generator response into a proposal
///
/// Missing `rateBreakdown`, `overhead` or `profit`, wrong types, and text
/// without a JSON object are all `MalformedProposal`.
pub fn parse_proposal(response: &str) -> Result<Proposal> {
    let json = extract_json(response)?;
    serde_json::from_str(json)
        .map_err(|e| EstimateError::MalformedProposal(format!("Invalid proposal: {}", e)))
}

/// Proposal generator backed by an LLM
pub struct LlmProposalGenerator<C> {
    client: C,
}

impl<C: Completion> LlmProposalGenerator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: Completion> ProposalGenerator for LlmProposalGenerator<C> {
    async fn propose(&self, request: &CostingRequest) -> Result<Proposal> {
        let prompt = render_prompt(request);
        let response = self.client.complete(COSTING_SYSTEM_PROMPT, &prompt).await?;
        parse_proposal(&response)
    }
}
