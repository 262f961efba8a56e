/// A fixed-cadence rate limiter with leading and trailing edges.
///
/// The first event after a quiet period fires immediately. Events inside the cooldown only
/// leave a pending flag, which [`Throttle::poll`] releases once the cooldown has elapsed. A
/// burst of any length therefore produces at most two firings per interval, and nothing is
/// queued: which events were collapsed is not recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    interval_ms: u64,
    last_fire_ms: Option<u64>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
            pending: false,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Registers an event. Returns `true` if it should be handled now.
    pub fn hit(&mut self, now_ms: u64) -> bool {
        if self.cooled_down(now_ms) {
            self.fire(now_ms);
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Releases a pending event once the cooldown has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.pending && self.cooled_down(now_ms) {
            self.fire(now_ms);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.last_fire_ms = None;
        self.pending = false;
    }

    fn fire(&mut self, now_ms: u64) {
        self.last_fire_ms = Some(now_ms);
        self.pending = false;
    }

    fn cooled_down(&self, now_ms: u64) -> bool {
        match self.last_fire_ms {
            None => true,
            // A clock that went backwards counts as elapsed rather than stalling the throttle.
            Some(last) => now_ms < last || now_ms - last >= self.interval_ms,
        }
    }
}
