//! src/lib.rs
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod error;
pub mod notifier;
pub mod routes;
pub mod startup;
pub mod telegram_client;
pub mod telemetry;
