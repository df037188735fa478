//! Fixed-window per-IP rate limiting for the credential endpoints.
//!
//! Counters live in process memory. A background task calls
//! [`RateLimiter::cleanup`] periodically so idle IPs do not accumulate.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::AppState;

const LOGIN_MAX_ATTEMPTS: u32 = 5;
const REGISTER_MAX_ATTEMPTS: u32 = 3;
const WINDOW: Duration = Duration::from_secs(60);

struct IpEntry {
    count: u32,
    window_start: Instant,
}

/// Shared counter map keyed by scope ("login", "register") then client IP.
#[derive(Clone, Default)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one attempt and returns whether it is still within the limit.
    pub fn check(&self, scope: &'static str, ip: &str, max: u32, window: Duration) -> bool {
        let mut buckets = match self.buckets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        let entry = buckets
            .entry(scope)
            .or_default()
            .entry(ip.to_string())
            .or_insert(IpEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }
        entry.count += 1;
        entry.count <= max
    }

    /// Drops IP entries whose window started longer than `older_than` ago.
    pub fn cleanup(&self, older_than: Duration) {
        let mut buckets = match self.buckets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        for per_ip in buckets.values_mut() {
            per_ip.retain(|_, entry| now.duration_since(entry.window_start) < older_than);
        }
    }
}

fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(value) = forwarded.to_str()
        && let Some(first) = value.split(',').next()
    {
        return first.trim().to_string();
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_ip(&request);
    if !state
        .rate_limiter
        .check("login", &ip, LOGIN_MAX_ATTEMPTS, WINDOW)
    {
        tracing::warn!(ip = %ip, "login rate limit exceeded");
        return too_many_requests();
    }
    next.run(request).await
}

pub async fn register_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_ip(&request);
    if !state
        .rate_limiter
        .check("register", &ip, REGISTER_MAX_ATTEMPTS, WINDOW)
    {
        tracing::warn!(ip = %ip, "register rate limit exceeded");
        return too_many_requests();
    }
    next.run(request).await
}

fn too_many_requests() -> Response {
    (
        http::StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "success": false,
            "message": "Too many requests, try again later"
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_max_then_blocks() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check("login", "1.2.3.4", 3, Duration::from_secs(60)));
        }
        assert!(!limiter.check("login", "1.2.3.4", 3, Duration::from_secs(60)));
    }

    #[test]
    fn window_resets_after_elapsed() {
        let limiter = RateLimiter::new();
        let window = Duration::from_millis(20);
        assert!(limiter.check("login", "1.2.3.4", 1, window));
        assert!(!limiter.check("login", "1.2.3.4", 1, window));

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("login", "1.2.3.4", 1, window));
    }

    #[test]
    fn scopes_and_ips_are_independent() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("login", "1.2.3.4", 1, Duration::from_secs(60)));
        assert!(!limiter.check("login", "1.2.3.4", 1, Duration::from_secs(60)));

        assert!(limiter.check("register", "1.2.3.4", 1, Duration::from_secs(60)));
        assert!(limiter.check("login", "5.6.7.8", 1, Duration::from_secs(60)));
    }

    #[test]
    fn cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new();
        limiter.check("login", "1.2.3.4", 5, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));
        limiter.cleanup(Duration::from_millis(10));

        let buckets = limiter.buckets.lock().unwrap();
        assert!(buckets.get("login").is_none_or(|m| m.is_empty()));
    }
}
