//! Trailing-edge debouncing on an explicit clock

/// Coalesces bursts of triggers into one firing `delay_ms` after the last one
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Restart the wait from `now`
    pub fn trigger(&mut self, now: f64) {
        self.deadline = Some(now + self.delay_ms);
    }

    /// Returns `true` once per burst, when `now` reaches the deadline
    pub fn ready(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
