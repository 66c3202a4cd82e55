//! `mc-domain`: types shared by every Minicontratos crate.
//!
//! Holds the error type, the TOML configuration model, the provider-agnostic
//! conversation/tool types, the contract and agent-response shapes, and the
//! structured trace events.

pub mod config;
pub mod contract;
pub mod error;
pub mod tool;
pub mod trace;
