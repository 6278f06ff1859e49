//! Per-client rate limiting for the API routes.
//!
//! Fixed-window counter keyed by client IP. The window resets lazily the
//! first time a client is seen after it expires.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::ErrorResponse;

struct WindowState {
    started: Instant,
    count: u32,
}

/// Fixed-window request limiter shared across handlers.
pub struct RateLimiter {
    max: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, WindowState>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `ip`; returns false once the client has
    /// exhausted its window.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut clients = self.clients.lock().expect("rate limiter map poisoned");

        let state = clients.entry(ip).or_insert(WindowState {
            started: now,
            count: 0,
        });
        if now.duration_since(state.started) >= self.window {
            state.started = now;
            state.count = 0;
        }

        state.count += 1;
        state.count <= self.max
    }
}

/// Rate-limit layer function applied to the `/api` routes.
pub async fn rate_limit_layer(
    limiter: std::sync::Arc<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    // Connect info is absent when the router is driven without a real
    // socket (unit tests); such requests pass through.
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    match ip {
        Some(ip) if !limiter.check(ip) => too_many_requests_response(),
        _ => next.run(request).await,
    }
}

fn too_many_requests_response() -> Response {
    let body = ErrorResponse {
        success: false,
        message: "Too many requests, please try again later".to_string(),
        errors: None,
    };

    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
}
