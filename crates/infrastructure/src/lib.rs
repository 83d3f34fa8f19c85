//! Infrastructure layer - Adapters, configuration and telemetry
//!
//! Implements the application's store ports and wires up process-level
//! concerns (configuration loading, logging, tracing export).

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::{FirestoreStore, InMemoryStore, Stores, build_stores};
pub use self::config::{AppConfig, ConfigValidationError, Environment};
