//! Route definitions
//!
//! Each protected route is wrapped as rate limiter → method check → API key
//! check → handler. The limiter sits outside the method router so that
//! rejected methods still count against the client's quota, and the API key
//! layer is a route layer so that a wrong method answers 405 before any key
//! check.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{MethodRouter, get, post},
};
use infrastructure::config::{DeploymentMode, ServerConfig};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    handlers,
    middleware::{API_KEY_HEADER, ApiKeyAuthLayer, RateLimiterConfig, RateLimiterLayer},
    state::AppState,
};

/// Create the router with all routes for the configured deployment mode
///
/// In `server` mode `/quote` is not rate-limited and `/health` is served.
/// In `functions` mode every endpoint shares one limiter and there is no
/// health route.
pub fn create_router(state: AppState) -> Router {
    let config = &state.config;
    let mode = config.server.mode;

    let auth = ApiKeyAuthLayer::new(config.security.api_key.as_ref());
    let limiter = RateLimiterLayer::new(&RateLimiterConfig::from(&config.security));

    let limited = |route: MethodRouter<AppState>| -> MethodRouter<AppState> {
        route.route_layer(auth.clone()).layer(limiter.clone())
    };

    let add_quote = post(handlers::quotes::add_quote);
    let add_quote = match mode {
        DeploymentMode::Server => add_quote.route_layer(auth.clone()),
        DeploymentMode::Functions => limited(add_quote),
    };

    let router = Router::new()
        .route("/random", limited(get(handlers::quotes::random_quote)))
        .route("/quote", add_quote)
        .route("/tags", limited(get(handlers::tags::list_tags)))
        .route("/tag", limited(post(handlers::tags::add_tag)));

    let router = match mode {
        DeploymentMode::Server => router.route("/health", get(handlers::health::health_check)),
        DeploymentMode::Functions => router,
    };

    info!(%mode, "Routes configured");

    router
        .layer(DefaultBodyLimit::max(config.server.max_body_size_bytes))
        .with_state(state)
}

/// Create the router wrapped in request ids, request tracing and CORS
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    let router = create_router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    );

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS policy: any origin when none are configured, otherwise only the
/// configured origins
fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if !server.cors_enabled {
        return None;
    }

    if server.allowed_origins.is_empty() {
        return Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE, API_KEY_HEADER]),
    )
}
