//! Stun timer (last-write-wins, no stacking).

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StunTimer {
    remaining: Option<f32>,
}

impl StunTimer {
    /// Starts or restarts the stun. Negative/NaN durations count as 0.
    pub fn start(&mut self, duration: f32) -> f32 {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.remaining = Some(duration);
        duration
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Returns `true` on the tick the stun elapses.
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };

        *remaining -= delta;
        if *remaining > 0.0 {
            return false;
        }

        self.remaining = None;
        true
    }
}
