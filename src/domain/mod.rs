//! Core domain types and logic.

pub mod sample;
pub mod analysis;
pub mod signal;
pub mod position;
pub mod risk;
pub mod strategy;
pub mod engine;
pub mod config_validation;
pub mod error;
