//! LLM boundary: HTTP client, costing prompts, proposal parsing, catalog assist

pub mod client;
pub mod prompt;
pub mod proposal;
pub mod suggest;

pub use client::{Completion, LlmClient};
pub use prompt::{render_prompt, CostingRequest};
pub use proposal::{parse_proposal, LlmProposalGenerator, Proposal, ProposalGenerator};
pub use suggest::{suggest_manpower_costs, suggest_material, MaterialSuggestion};
