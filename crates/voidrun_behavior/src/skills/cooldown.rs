//! Cooldown tracker: real-time re-use lockout per skill.

use super::descriptor::SkillId;
use super::registry::SkillRegistry;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CooldownTimer {
    skill: SkillId,
    remaining: f32,
}

/// Owns every `on_cooldown` flag of one registry.
///
/// Timers run on elapsed time, independent of decision cycles and of the
/// pipeline that armed them.
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    timers: Vec<CooldownTimer>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the cooldown of `id`. Returns `false` for skills without cooldown.
    ///
    /// Re-arming a running timer restarts it.
    pub fn arm(&mut self, registry: &mut SkillRegistry, id: SkillId) -> bool {
        let Some(skill) = registry.get_mut(id) else {
            return false;
        };

        let duration = skill.cooldown_secs();
        if duration <= 0.0 {
            return false;
        }

        skill.set_on_cooldown(true);

        match self.timers.iter_mut().find(|timer| timer.skill == id) {
            Some(timer) => timer.remaining = duration,
            None => self.timers.push(CooldownTimer {
                skill: id,
                remaining: duration,
            }),
        }

        true
    }

    /// Advances all timers; returns skills that became usable this tick.
    pub fn tick(&mut self, registry: &mut SkillRegistry, delta: f32) -> Vec<SkillId> {
        let mut ready = Vec::new();

        self.timers.retain_mut(|timer| {
            timer.remaining -= delta;
            if timer.remaining > 0.0 {
                return true;
            }

            if let Some(skill) = registry.get_mut(timer.skill) {
                skill.set_on_cooldown(false);
            }
            ready.push(timer.skill);
            false
        });

        ready
    }

    pub fn remaining(&self, id: SkillId) -> Option<f32> {
        self.timers
            .iter()
            .find(|timer| timer.skill == id)
            .map(|timer| timer.remaining)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}
