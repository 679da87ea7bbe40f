//! Death sequence phases (one-shot).

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeathPhase {
    #[default]
    Alive,
    /// Die effect is playing
    Effect { remaining: f32 },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathStep {
    /// Not dying (alive or already finished)
    Inactive,
    Running,
    /// Effect elapsed this tick; finalize now
    Elapsed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeathSequence {
    phase: DeathPhase,
}

impl DeathSequence {
    /// Starts the die effect. Returns `false` if the sequence already started.
    pub fn begin(&mut self, duration: f32) -> bool {
        if self.phase != DeathPhase::Alive {
            return false;
        }

        self.phase = DeathPhase::Effect {
            remaining: duration.max(0.0),
        };
        true
    }

    pub fn advance(&mut self, delta: f32) -> DeathStep {
        let DeathPhase::Effect { remaining } = &mut self.phase else {
            return DeathStep::Inactive;
        };

        *remaining -= delta;
        if *remaining > 0.0 {
            DeathStep::Running
        } else {
            DeathStep::Elapsed
        }
    }

    pub fn finish(&mut self) {
        self.phase = DeathPhase::Finished;
    }

    pub fn phase(&self) -> DeathPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == DeathPhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_only_once() {
        let mut death = DeathSequence::default();
        assert!(death.begin(0.5));
        assert!(!death.begin(0.5));
    }

    #[test]
    fn test_effect_runs_then_elapses() {
        let mut death = DeathSequence::default();
        assert_eq!(death.advance(0.1), DeathStep::Inactive);

        assert_eq!(death.phase(), DeathPhase::Alive);

        death.begin(0.5);
        assert_eq!(death.advance(0.25), DeathStep::Running);
        assert_eq!(death.phase(), DeathPhase::Effect { remaining: 0.25 });
        assert_eq!(death.advance(0.25), DeathStep::Elapsed);

        death.finish();
        assert!(death.is_finished());
        assert_eq!(death.phase(), DeathPhase::Finished);
        assert_eq!(death.advance(0.25), DeathStep::Inactive);
        assert!(!death.begin(1.0));
    }
}
