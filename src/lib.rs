//! Property Concierge - Conversational Property Search
//!
//! Turns free-text Spanish requests ("depto en arriendo en Providencia hasta
//! 900.000") into structured filters over several turns, asking one targeted
//! question whenever a required filter is missing, and matches the result
//! against listings normalized from heterogeneous JSON sources.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
