//! Rate limiting middleware for axum.
//!
//! Each protected route carries its own layer naming a stable operation and
//! the policy resolved for it at router assembly. The caller is identified by
//! authenticated user id, else client address.
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the window resets
//! - `Retry-After`: Seconds to wait (only on 429 response)
//!
//! # Example
//!
//! ```ignore
//! let limits = RouteRateLimits::new(limiter, RateLimitPolicies::defaults());
//!
//! let app = Router::new()
//!     .route("/auth/login", limits.protect(operations::LOGIN, post(login)));
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::rate_limiter::RateLimitPolicies;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::rate_limit::RateLimitPolicy;
use crate::ports::{RateLimitKey, RateLimitResult, RateLimiter};

/// Identifier used when neither a user nor an address is known.
pub const ANONYMOUS_IDENTIFIER: &str = "anonymous";

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    /// Maximum requests allowed in the window.
    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    /// Requests remaining in the current window.
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Unix timestamp when the window resets.
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Per-route middleware state.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<dyn RateLimiter>,
    pub operation: &'static str,
    pub policy: Option<RateLimitPolicy>,
}

/// Limiter plus the operation-to-policy map, used while assembling routes.
#[derive(Clone)]
pub struct RouteRateLimits {
    limiter: Arc<dyn RateLimiter>,
    policies: Arc<RateLimitPolicies>,
}

impl RouteRateLimits {
    pub fn new(limiter: Arc<dyn RateLimiter>, policies: RateLimitPolicies) -> Self {
        Self {
            limiter,
            policies: Arc::new(policies),
        }
    }

    /// Middleware state for `operation`, with its policy if one is configured.
    pub fn state(&self, operation: &'static str) -> RateLimitState {
        RateLimitState {
            limiter: self.limiter.clone(),
            operation,
            policy: self.policies.get(operation).copied(),
        }
    }

    /// Wrap a method router so every call is admitted under `operation`.
    pub fn protect<S>(&self, operation: &'static str, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route.route_layer(middleware::from_fn_with_state(
            self.state(operation),
            rate_limit_middleware,
        ))
    }
}

/// Rate limiting middleware for a single operation.
///
/// 1. Resolves the caller identifier (user id, client address, or anonymous)
/// 2. Asks the limiter to admit `<identifier>:<operation>`
/// 3. Returns 429 when denied, 503 when the limiter fails closed
/// 4. Adds rate limit headers to admitted responses
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let identifier = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.id.to_string())
        .or_else(|| extract_client_ip(&request, connect_info.as_ref()))
        .unwrap_or_else(|| ANONYMOUS_IDENTIFIER.to_string());

    let key = RateLimitKey::new(identifier, state.operation);

    match state.limiter.admit(&key, state.policy.as_ref()).await {
        Ok(RateLimitResult::Allowed(status)) => {
            let mut response = next.run(request).await;
            add_rate_limit_headers(
                &mut response,
                status.limit,
                status.remaining,
                status.reset_at.as_unix_secs(),
            );
            response
        }
        Ok(RateLimitResult::Unrestricted) | Ok(RateLimitResult::Bypassed) => {
            next.run(request).await
        }
        Ok(RateLimitResult::Denied(denied)) => rate_limit_response(
            denied.limit,
            denied.retry_after_secs,
            denied.reset_at.as_unix_secs(),
            &denied.message,
        ),
        Err(e) => {
            tracing::warn!(operation = state.operation, error = %e, "Rejecting request, rate limiter unavailable");
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
                .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Extract client IP from request, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
fn extract_client_ip<B>(
    request: &axum::http::Request<B>,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<String> {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded.split(',').next().map(str::trim) {
            if !first_ip.is_empty() {
                return Some(first_ip.to_string());
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return Some(real_ip.to_string());
        }
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

/// Create a 429 Too Many Requests response.
fn rate_limit_response(limit: u32, retry_after_secs: u64, reset_at: u64, message: &str) -> Response {
    let mut response = ErrorResponse::new("RATE_LIMIT_EXCEEDED", message)
        .into_response_with(StatusCode::TOO_MANY_REQUESTS);

    add_rate_limit_headers(&mut response, limit, 0, reset_at);
    response
        .headers_mut()
        .insert("Retry-After", HeaderValue::from(retry_after_secs));
    response
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(response: &mut Response, limit: u32, remaining: u32, reset_at: u64) {
    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(remaining),
    );
    headers.insert(headers::X_RATELIMIT_RESET.clone(), HeaderValue::from(reset_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryKeyValueStore;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::rate_limiter::{FailurePolicy, FixedWindowRateLimiter};
    use crate::domain::foundation::{UserId, UserRole};
    use crate::ports::{KeyValueStore, StoreError};
    use async_trait::async_trait;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    fn limiter() -> Arc<dyn RateLimiter> {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = Arc::new(InMemoryKeyValueStore::new(clock.clone()));
        Arc::new(FixedWindowRateLimiter::new(store, clock))
    }

    fn app(limiter: Arc<dyn RateLimiter>, policies: RateLimitPolicies) -> Router {
        let limits = RouteRateLimits::new(limiter, policies);
        Router::new().route(
            "/ping",
            limits.protect("ping", get(|| async { "pong" })),
        )
    }

    fn request_from(ip: &str) -> Request {
        Request::builder()
            .uri("/ping")
            .header("X-Forwarded-For", ip)
            .body(Body::empty())
            .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // IP Extraction Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn extract_ip_from_x_forwarded_for() {
        let request = axum::http::Request::builder()
            .uri("/test")
            .header("X-Forwarded-For", "1.2.3.4, 5.6.7.8")
            .body(())
            .unwrap();

        assert_eq!(extract_client_ip(&request, None), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_ip_from_x_real_ip() {
        let request = axum::http::Request::builder()
            .uri("/test")
            .header("X-Real-IP", "9.8.7.6")
            .body(())
            .unwrap();

        assert_eq!(extract_client_ip(&request, None), Some("9.8.7.6".to_string()));
    }

    #[test]
    fn extract_ip_falls_back_to_connect_info() {
        let request = axum::http::Request::builder().uri("/test").body(()).unwrap();
        let addr: SocketAddr = "10.1.2.3:5555".parse().unwrap();

        assert_eq!(
            extract_client_ip(&request, Some(&ConnectInfo(addr))),
            Some("10.1.2.3".to_string())
        );
        assert_eq!(extract_client_ip(&request, None), None);
    }

    #[test]
    fn blank_x_real_ip_falls_through() {
        let request = axum::http::Request::builder()
            .uri("/test")
            .header("X-Real-IP", "  ")
            .body(())
            .unwrap();
        let addr: SocketAddr = "10.1.2.3:5555".parse().unwrap();

        assert_eq!(
            extract_client_ip(&request, Some(&ConnectInfo(addr))),
            Some("10.1.2.3".to_string())
        );
        assert_eq!(extract_client_ip(&request, None), None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn rejects_after_limit_with_headers() {
        let policies = RateLimitPolicies::none().with("ping", RateLimitPolicy::per_minute(2));
        let app = app(limiter(), policies);

        for remaining in ["1", "0"] {
            let response = app.clone().oneshot(request_from("1.1.1.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()["x-ratelimit-limit"], "2");
            assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
        }

        let response = app.clone().oneshot(request_from("1.1.1.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
        assert!(response.headers().contains_key("x-ratelimit-reset"));

        let other = app.oneshot(request_from("2.2.2.2")).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unconfigured_operation_is_unrestricted() {
        let app = app(limiter(), RateLimitPolicies::none());
        for _ in 0..50 {
            let response = app.clone().oneshot(request_from("1.1.1.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(!response.headers().contains_key("x-ratelimit-limit"));
        }
    }

    #[tokio::test]
    async fn authenticated_user_is_keyed_by_id() {
        let policies = RateLimitPolicies::none().with("ping", RateLimitPolicy::per_minute(1));
        let app = app(limiter(), policies);
        let user = AuthenticatedUser::new(UserId::new(), "a@example.com", UserRole::User);

        let as_user = || {
            let mut request = request_from("1.1.1.1");
            request.extensions_mut().insert(user.clone());
            request
        };

        assert_eq!(app.clone().oneshot(as_user()).await.unwrap().status(), StatusCode::OK);
        assert_eq!(
            app.clone().oneshot(as_user()).await.unwrap().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        // Same address without the user still has its own budget.
        assert_eq!(
            app.oneshot(request_from("1.1.1.1")).await.unwrap().status(),
            StatusCode::OK
        );
    }

    struct DownStore;

    #[async_trait]
    impl KeyValueStore for DownStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_outage_follows_failure_policy() {
        let clock = Arc::new(ManualClock::new(0));
        let policies = RateLimitPolicies::none().with("ping", RateLimitPolicy::per_minute(1));

        let open: Arc<dyn RateLimiter> =
            Arc::new(FixedWindowRateLimiter::new(Arc::new(DownStore), clock.clone()));
        let response = app(open, policies.clone())
            .oneshot(request_from("1.1.1.1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let closed: Arc<dyn RateLimiter> = Arc::new(
            FixedWindowRateLimiter::new(Arc::new(DownStore), clock)
                .with_failure_policy(FailurePolicy::FailClosed),
        );
        let response = app(closed, policies)
            .oneshot(request_from("1.1.1.1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Response Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn rate_limit_response_has_429_status_and_retry_after() {
        let response = rate_limit_response(100, 30, 1_700_000_060, "Too Many Requests");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "30");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
    }

    #[test]
    fn rate_limit_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RateLimitState>();
        assert_send_sync::<RouteRateLimits>();
    }
}
