/// Drops repeated invocations that arrive sooner than `interval` after the last accepted one.
#[derive(Clone, Copy, Debug)]
pub struct RepeatGate {
    interval: f64,
    last: Option<f64>,
}

impl RepeatGate {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            interval: f64::from(interval_secs.max(0.0)),
            last: None,
        }
    }

    /// Accepts and records `now` when the interval has passed, otherwise leaves state alone.
    pub fn try_fire(&mut self, now: f64) -> bool {
        match self.last {
            Some(last) if now - last < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
