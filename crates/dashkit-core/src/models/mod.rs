//! Domain models, one module per dashboard.
//!
//! Field names serialize in camelCase and enum tags in snake_case so stored
//! collections stay readable by the browser dashboards.

pub mod clinic;
pub mod factory;
pub mod physio;
pub mod realestate;
pub mod social;
pub mod toys;
