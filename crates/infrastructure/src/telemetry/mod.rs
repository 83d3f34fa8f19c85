//! Telemetry and distributed tracing infrastructure
//!
//! Console logging plus optional OpenTelemetry export over OTLP.

mod otel;

pub use otel::{TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
