//! API key authentication middleware
//!
//! Checks the `x-api-key` header against the configured key. Both values are
//! hashed with SHA-256 and the digests compared in constant time, so neither
//! the key's content nor its length leaks through response timing.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    http::HeaderName,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::debug;

use crate::error::ApiError;

/// Header carrying the shared API key
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Layer that applies API key authentication
///
/// With no key configured every request is rejected.
#[derive(Clone, Debug)]
pub struct ApiKeyAuthLayer {
    expected_digest: Option<Arc<[u8]>>,
}

impl ApiKeyAuthLayer {
    #[must_use]
    pub fn new(api_key: Option<&SecretString>) -> Self {
        let expected_digest = api_key
            .map(|key| key.expose_secret())
            .filter(|key| !key.is_empty())
            .map(|key| Arc::from(Sha256::digest(key.as_bytes()).as_slice()));

        Self { expected_digest }
    }
}

impl<S> Layer<S> for ApiKeyAuthLayer {
    type Service = ApiKeyAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuth {
            inner,
            expected_digest: self.expected_digest.clone(),
        }
    }
}

/// Middleware service for API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuth<S> {
    inner: S,
    expected_digest: Option<Arc<[u8]>>,
}

impl<S> ApiKeyAuth<S> {
    fn is_authorized(&self, req: &Request) -> bool {
        let (Some(expected), Some(provided)) =
            (&self.expected_digest, req.headers().get(&API_KEY_HEADER))
        else {
            return false;
        };

        let provided = Sha256::digest(provided.as_bytes());
        provided.as_slice().ct_eq(expected).into()
    }
}

impl<S> Service<Request> for ApiKeyAuth<S>
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
        if !self.is_authorized(&req) {
            debug!(path = %req.uri().path(), "Rejected request with missing or wrong API key");
            return Box::pin(async { Ok(ApiError::Unauthorized.into_response()) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
