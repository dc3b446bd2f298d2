// =============================================================================
// Central Application State: Quant Analytics Service
// =============================================================================
//
// Process-wide state shared by the HTTP handlers via `Arc<AppState>`. It holds
// configuration and operational counters only; the analytics engine itself is
// stateless and never sees this struct.
//
// Thread safety:
//   - Atomic counter for lock-free request accounting.
//   - parking_lot::RwLock for the bounded error log.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::ServiceConfig;

// =============================================================================
// Error Record
// =============================================================================

/// A rejected request, kept for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error kind (e.g. `insufficient_data`).
    pub code: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

// =============================================================================
// AppState
// =============================================================================

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

pub struct AppState {
    pub config: ServiceConfig,

    /// Number of computation requests received since start-up.
    pub requests_served: AtomicU64,

    pub recent_errors: RwLock<VecDeque<ErrorRecord>>,

    /// Instant when the service was started. Used for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            requests_served: AtomicU64::new(0),
            recent_errors: RwLock::new(VecDeque::with_capacity(MAX_RECENT_ERRORS)),
            start_time: Instant::now(),
        }
    }

    /// Count one incoming computation request; returns the new total.
    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    /// Append an error record. The log is bounded to [`MAX_RECENT_ERRORS`];
    /// the oldest entry is evicted first.
    pub fn push_error(&self, code: &str, message: String) {
        let record = ErrorRecord {
            message,
            code: code.to_string(),
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push_back(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.pop_front();
        }
    }

    pub fn recent_error_count(&self) -> usize {
        self.recent_errors.read().len()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
