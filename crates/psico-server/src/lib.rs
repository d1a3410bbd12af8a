//! HTTP/JSON API for the psychopedagogy clinical records store.
//!
//! This crate wires [`psico_core::ClinicCore`] to an axum router, and owns the
//! process concerns around it: configuration, logging and the CLI.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;

pub use api::router::app_router;
pub use api::types::ApiContext;
