//! # Rate-Limited Logging
//!
//! A meter pushes a telegram every second or faster; when the serial line is
//! noisy, per-byte and per-packet error paths would otherwise flood the log.
//! [`LogThrottle`] caps how many messages a call site may emit per time
//! window.

use std::time::Instant;

/// Throttling structure for rate-limiting log messages.
#[derive(Debug)]
pub struct LogThrottle {
    /// Time window for throttling (in milliseconds)
    window_ms: u64,
    /// Maximum messages allowed per window
    cap: u32,
    /// Current message count in window
    count: u32,
    /// Start time of current window
    t0: Instant,
}

impl LogThrottle {
    /// Create a new throttle allowing `cap` messages per `window_ms`.
    pub fn new(window_ms: u64, cap: u32) -> Self {
        Self {
            window_ms,
            cap,
            count: 0,
            t0: Instant::now(),
        }
    }

    /// Check if logging is allowed (resets counter after window expires).
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.t0).as_millis() as u64;

        if elapsed_ms > self.window_ms {
            self.t0 = now;
            self.count = 0;
        }

        self.count += 1;
        self.count <= self.cap
    }

    /// Start a new window immediately.
    pub fn reset(&mut self) {
        self.t0 = Instant::now();
        self.count = 0;
    }
}
