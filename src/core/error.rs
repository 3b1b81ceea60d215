use crate::core::types::{ClientId, ItemId, RateId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Item {0} has no rate breakdown")]
    NoBreakdown(ItemId),

    #[error("Item {0} has an empty description")]
    EmptyDescription(ItemId),

    #[error("Row {index} out of range in {section}")]
    RowOutOfRange { section: &'static str, index: usize },

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Client profile not found: {0}")]
    ClientNotFound(ClientId),

    #[error("Rate not found: {0}")]
    RateNotFound(RateId),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Malformed proposal: {0}")]
    MalformedProposal(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EstimateError>;
