//! OpenTelemetry initialization and configuration
//!
//! Sets up console logging (text or JSON) and, when enabled, trace export to
//! an OTLP collector. Falls back to console-only logging when the exporter
//! cannot be built.

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{Sampler, SdkTracerProvider},
};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::LogFormat;

/// Configuration for telemetry/tracing
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Whether OpenTelemetry export is enabled
    #[serde(default)]
    pub enabled: bool,

    /// OTLP endpoint URL (e.g., "http://localhost:4317" for gRPC)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service name for traces
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Sampling ratio (0.0 - 1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Export timeout in seconds
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,

    /// Log level filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Fall back to console-only logging if the OTLP exporter fails
    #[serde(default = "default_graceful_fallback")]
    pub graceful_fallback: bool,
}

const fn default_sampling_ratio() -> f64 {
    1.0
}

const fn default_export_timeout() -> u64 {
    30
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "quotes-api".to_string()
}

fn default_log_filter() -> String {
    "info,tower_http=info".to_string()
}

const fn default_graceful_fallback() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
            export_timeout_secs: default_export_timeout(),
            log_filter: default_log_filter(),
            graceful_fallback: default_graceful_fallback(),
        }
    }
}

impl TelemetryConfig {
    fn sampler(&self) -> Sampler {
        if (self.sampling_ratio - 1.0).abs() < f64::EPSILON {
            Sampler::AlwaysOn
        } else if self.sampling_ratio <= 0.0 {
            Sampler::AlwaysOff
        } else {
            Sampler::TraceIdRatioBased(self.sampling_ratio)
        }
    }
}

/// Guard that shuts down the tracer provider when dropped
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("active", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::error!("Failed to shutdown tracer provider: {:?}", e);
            }
        }
    }
}

/// Console output layer in the requested format
fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = tracing_subscriber::fmt::layer().with_target(true);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
    }
}

/// Initialize logging and, if enabled, OTLP trace export
///
/// Returns a guard that must be kept alive for the duration of the
/// application. Dropping it flushes pending spans.
pub fn init_telemetry(
    config: &TelemetryConfig,
    format: LogFormat,
) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if !config.enabled {
        tracing_subscriber::registry()
            .with(fmt_layer(format))
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;

        info!("Telemetry initialized (OTLP disabled, console only)");
        return Ok(TelemetryGuard { provider: None });
    }

    let exporter_result = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .with_timeout(Duration::from_secs(config.export_timeout_secs))
        .build();

    match exporter_result {
        Ok(exporter) => {
            let resource = Resource::builder()
                .with_service_name(config.service_name.clone())
                .build();

            let provider = SdkTracerProvider::builder()
                .with_batch_exporter(exporter)
                .with_sampler(config.sampler())
                .with_resource(resource)
                .build();

            let tracer = provider.tracer(config.service_name.clone());

            tracing_subscriber::registry()
                .with(fmt_layer(format))
                .with(OpenTelemetryLayer::new(tracer))
                .with(env_filter)
                .try_init()
                .map_err(|e| TelemetryError::Init(e.to_string()))?;

            info!(
                endpoint = %config.endpoint,
                service = %config.service_name,
                sampling = %config.sampling_ratio,
                "Telemetry initialized with OTLP export"
            );

            Ok(TelemetryGuard {
                provider: Some(provider),
            })
        },
        Err(e) if config.graceful_fallback => {
            tracing_subscriber::registry()
                .with(fmt_layer(format))
                .with(env_filter)
                .try_init()
                .map_err(|e| TelemetryError::Init(e.to_string()))?;

            warn!(
                endpoint = %config.endpoint,
                error = %e,
                "OTLP exporter unavailable, falling back to console-only logging"
            );
            Ok(TelemetryGuard { provider: None })
        },
        Err(e) => Err(TelemetryError::Exporter(e.to_string())),
    }
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// Failed to create OTLP exporter
    #[error("Failed to create OTLP exporter: {0}")]
    Exporter(String),
}
