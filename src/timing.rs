/// Elapsed-time gate for simulation steps, decoupling tick rate from frame
/// rate. Timestamps are monotonic milliseconds supplied by the caller. The
/// interval is passed on every call so slider changes apply mid-round.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    last_move_ms: f64,
}

impl TickScheduler {
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_move_ms: now_ms,
        }
    }

    /// Re-arm at `now`. Called on every transition into Playing.
    pub fn restart(&mut self, now_ms: f64) {
        self.last_move_ms = now_ms;
    }

    /// True at most once per call, when a full interval has elapsed. The
    /// reference point resets to `now` rather than advancing by the
    /// interval, so cadence may drift under frame jitter but never exceeds
    /// one step per interval.
    pub fn fire(&mut self, interval_ms: i32, now_ms: f64) -> bool {
        if now_ms - self.last_move_ms >= interval_ms as f64 {
            self.last_move_ms = now_ms;
            true
        } else {
            false
        }
    }
}

pub const COUNTDOWN_DURATION_MS: f64 = 3000.0;

/// The pre-round countdown timer.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    start_ms: f64,
}

impl Countdown {
    pub fn started_at(now_ms: f64) -> Self {
        Self { start_ms: now_ms }
    }

    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= COUNTDOWN_DURATION_MS
    }

    /// Whole seconds left, floored at zero.
    pub fn remaining_secs(&self, now_ms: f64) -> i32 {
        let remaining = (COUNTDOWN_DURATION_MS - (now_ms - self.start_ms)).max(0.0);
        (remaining / 1000.0) as i32
    }
}
