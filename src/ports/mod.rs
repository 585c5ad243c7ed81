//! Port traits for external collaborators.

pub mod config_port;
pub mod tick_port;
