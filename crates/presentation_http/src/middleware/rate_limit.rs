//! Rate limiting middleware
//!
//! Fixed-window limiter keyed by client IP. Each client gets `max_requests`
//! per window; the count resets when the window that started with the
//! client's first request has elapsed.

use std::{
    collections::HashMap,
    future::Future,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderName, HeaderValue, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use infrastructure::config::SecurityConfig;
use parking_lot::Mutex;
use tower::{Layer, Service};
use tracing::warn;

use crate::error::ApiError;

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");
const RATELIMIT_POLICY: HeaderName = HeaderName::from_static("ratelimit-policy");

/// Rate limiter configuration
#[derive(Clone, Debug)]
pub struct RateLimiterConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Maximum requests per client per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
    /// Peers allowed to report the client address via `X-Forwarded-For`
    pub trusted_proxies: Vec<IpAddr>,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 60,
            window: Duration::from_secs(60),
            trusted_proxies: Vec::new(),
        }
    }
}

impl From<&SecurityConfig> for RateLimiterConfig {
    fn from(security: &SecurityConfig) -> Self {
        Self {
            enabled: security.rate_limit_enabled,
            max_requests: security.rate_limit_requests,
            window: Duration::from_secs(security.rate_limit_window_secs),
            trusted_proxies: security.trusted_proxies.clone(),
        }
    }
}

/// Outcome of a single rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Length of every window
    pub window: Duration,
    /// Time until the client's current window ends
    pub reset_after: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Windows {
    by_client: HashMap<IpAddr, Window>,
    last_sweep: Instant,
}

/// Shared rate limiter state
#[derive(Debug)]
pub struct RateLimiterState {
    windows: Mutex<Windows>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiterState {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(Windows {
                by_client: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            max_requests,
            window,
        }
    }

    /// Count a request from `ip` arriving now
    pub fn check(&self, ip: IpAddr) -> RateLimitDecision {
        self.check_at(ip, Instant::now())
    }

    /// Count a request from `ip` arriving at `now`
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitDecision {
        let mut windows = self.windows.lock();

        if now.duration_since(windows.last_sweep) >= self.window {
            let length = self.window;
            windows
                .by_client
                .retain(|_, w| now.duration_since(w.started) < length);
            windows.last_sweep = now;
        }

        let window = windows.by_client.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= self.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let allowed = window.count < self.max_requests;
        if allowed {
            window.count += 1;
        }

        RateLimitDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(window.count),
            window: self.window,
            reset_after: self
                .window
                .saturating_sub(now.duration_since(window.started)),
        }
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().by_client.len()
    }
}

/// Layer that applies rate limiting
///
/// Clones share one [`RateLimiterState`], so a single layer applied to
/// several routes enforces one quota across all of them.
#[derive(Clone, Debug)]
pub struct RateLimiterLayer {
    state: Arc<RateLimiterState>,
    enabled: bool,
    trusted_proxies: Arc<[IpAddr]>,
}

impl RateLimiterLayer {
    #[must_use]
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            state: Arc::new(RateLimiterState::new(config.max_requests, config.window)),
            enabled: config.enabled,
            trusted_proxies: config.trusted_proxies.clone().into(),
        }
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            state: Arc::clone(&self.state),
            enabled: self.enabled,
            trusted_proxies: Arc::clone(&self.trusted_proxies),
        }
    }
}

/// Middleware service for rate limiting
#[derive(Clone, Debug)]
pub struct RateLimiter<S> {
    inner: S,
    state: Arc<RateLimiterState>,
    enabled: bool,
    trusted_proxies: Arc<[IpAddr]>,
}

impl<S> Service<Request> for RateLimiter<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let mut inner = self.inner.clone();

        if !self.enabled {
            return Box::pin(async move { inner.call(req).await });
        }

        let client_ip = client_ip(&req, &self.trusted_proxies);
        let decision = self.state.check(client_ip);

        if !decision.allowed {
            warn!(client = %client_ip, path = %req.uri().path(), "Rate limit exceeded");
            let mut response = ApiError::RateLimited.into_response();
            let headers = response.headers_mut();
            insert_headers(headers, &decision);
            headers.insert(RETRY_AFTER, HeaderValue::from(reset_secs(&decision)));
            return Box::pin(async { Ok(response) });
        }

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            insert_headers(response.headers_mut(), &decision);
            Ok(response)
        })
    }
}

fn reset_secs(decision: &RateLimitDecision) -> u64 {
    let reset = decision.reset_after;
    reset.as_secs() + u64::from(reset.subsec_nanos() > 0)
}

fn insert_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs(decision)));
    // Quota policy, e.g. `60;w=60`
    let policy = format!("{};w={}", decision.limit, decision.window.as_secs());
    if let Ok(policy) = HeaderValue::try_from(policy) {
        headers.insert(RATELIMIT_POLICY, policy);
    }
}

/// Resolve the client address for a request
///
/// `X-Forwarded-For` is honoured only when the direct peer is a trusted
/// proxy; the rightmost untrusted hop is taken as the client.
fn client_ip(req: &Request, trusted_proxies: &[IpAddr]) -> IpAddr {
    let Some(peer) = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
    else {
        return IpAddr::V4(Ipv4Addr::LOCALHOST);
    };

    if !trusted_proxies.contains(&peer) {
        return peer;
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|forwarded| {
            forwarded
                .rsplit(',')
                .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
                .find(|ip| !trusted_proxies.contains(ip))
        })
        .unwrap_or(peer)
}
