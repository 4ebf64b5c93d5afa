//! Stats Service
//!
//! HTTP front end for the draft statistics pipelines. This crate wires the
//! configuration, logging, document store and warp routes together and
//! exposes them for the `stats-service` binary.

pub mod config;
pub mod logging;
pub mod rest_api;
pub mod service;
pub mod signals;

pub use config::{load_config, LoggingConfig, ServerConfig, ServiceConfig};
pub use logging::initialize_logging;
pub use rest_api::{create_routes, ApiState};
pub use service::StatsService;
pub use signals::shutdown_signal;
