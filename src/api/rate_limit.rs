//! Inbound rate limiting
//!
//! Sliding-window limiter keyed by client IP address, applied to every route
//! as axum middleware.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Number of tracked addresses above which idle ones are swept
const SWEEP_THRESHOLD: usize = 10_000;

/// Sliding-window rate limiter
///
/// Remembers the arrival time of every accepted request per address and
/// admits a new one only while fewer than `max_requests` fall inside the
/// trailing window.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Allow `max_requests` per `window` for each address
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Try to consume one request for `addr`. Returns `true` if allowed.
    pub async fn check(&self, addr: IpAddr) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;

        if hits.len() > SWEEP_THRESHOLD {
            let window = self.window;
            hits.retain(|_, times| times.back().is_some_and(|t| now.duration_since(*t) < window));
        }

        let times = hits.entry(addr).or_default();
        while times
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            times.pop_front();
        }

        if times.len() >= self.max_requests {
            return false;
        }
        times.push_back(now);
        true
    }
}

/// Client address from the connection info, if the server recorded it
///
/// Requests without connection info share the unspecified address.
pub fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware rejecting requests over the limit with 429
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    if !state.rate_limiter.check(client).await {
        warn!(client = %client, uri = %request.uri(), "Rate limit exceeded");
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}
