use analysis_core::AnalysisError;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use market_cache::{Clock, SystemClock};
use std::collections::VecDeque;
use std::sync::Arc;

/// Sliding-window rate limiter keyed by source name: at most `max_requests`
/// per `window` for each source.
///
/// Unlike a blocking limiter this never waits; a source over its budget is
/// refused with [`AnalysisError::RateLimited`] and the caller moves on.
#[derive(Clone)]
pub struct SourceRateLimiter {
    requests: Arc<DashMap<String, VecDeque<DateTime<Utc>>>>,
    max_requests: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl SourceRateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    /// `max_requests` per minute
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::minutes(1))
    }

    pub fn with_clock(max_requests: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            max_requests,
            window,
            clock,
        }
    }

    /// Record a request for `source`, or refuse it when the window is full.
    pub fn try_acquire(&self, source: &str) -> Result<(), AnalysisError> {
        let now = self.clock.now();
        let mut timestamps = self.requests.entry(source.to_string()).or_default();

        // Remove timestamps outside the window
        while let Some(&front) = timestamps.front() {
            if now - front >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.max_requests {
            tracing::debug!(
                "Rate limiter: {} has {} requests in the current window",
                source,
                timestamps.len()
            );
            return Err(AnalysisError::RateLimited(source.to_string()));
        }

        timestamps.push_back(now);
        Ok(())
    }

    /// Requests still counted against `source`
    pub fn in_window(&self, source: &str) -> usize {
        let now = self.clock.now();
        self.requests
            .get(source)
            .map(|ts| ts.iter().filter(|t| now - **t < self.window).count())
            .unwrap_or(0)
    }
}
