//! Health check handler

/// Liveness check; needs no key and is never rate-limited
pub async fn health_check() -> &'static str {
    "OK"
}
