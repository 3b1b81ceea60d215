//! Core types, errors, and configuration shared by the estimator

pub mod config;
pub mod error;
pub mod types;
