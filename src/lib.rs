pub mod app_state;
pub mod configuration;
pub mod domain;
pub mod provisioning;
pub mod reference_store;
pub mod routes;
pub mod startup;
pub mod telemetry;
