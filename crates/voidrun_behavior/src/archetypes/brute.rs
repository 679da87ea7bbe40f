//! Brute: melee enemy with a single Cleave.
//!
//! Idle → медленно сближается с целью до дистанции удара.
//! Нет цели → нет скилла.

use bevy::prelude::*;

use super::{register_profile_skill, warn_unknown_skills};
use crate::behavior::{Behavior, BehaviorHooks, BehaviorSignal, HookContext};
use crate::config::{BehaviorConfig, ConfigError, EnemyProfile, SkillConfig};
use crate::skills::SkillId;

pub const CLEAVE: &str = "Cleave";

const CLEAVE_REACH: f32 = 2.5;
const CLEAVE_DAMAGE: u32 = 12;

pub fn profile() -> EnemyProfile {
    EnemyProfile {
        behavior: BehaviorConfig {
            max_health: 80,
            decision_interval: 0.5,
            ..Default::default()
        },
        skills: vec![SkillConfig::new(CLEAVE).with_timing(0.5, 0.4, 1.5)],
    }
}

pub fn build(profile: &EnemyProfile) -> Result<Behavior, ConfigError> {
    profile.validate()?;

    let mut behavior = Behavior::new(&profile.behavior, BruteHooks::default()).with_label("Brute");
    warn_unknown_skills("Brute", profile, &[CLEAVE]);

    register_profile_skill(&mut behavior, profile, CLEAVE, |ctx| {
        let Some(distance) = ctx.distance_to_target() else {
            return;
        };

        let position = ctx.position();
        ctx.emit(BehaviorSignal::SpawnEffect {
            name: "cleave".to_string(),
            position,
        });

        if distance <= CLEAVE_REACH {
            ctx.emit(BehaviorSignal::DealDamage {
                amount: CLEAVE_DAMAGE,
            });
        }
    })?;

    Ok(behavior)
}

#[derive(Debug, Clone)]
pub struct BruteHooks {
    pub drift_speed: f32,
}

impl Default for BruteHooks {
    fn default() -> Self {
        Self { drift_speed: 1.5 }
    }
}

impl BehaviorHooks for BruteHooks {
    fn select_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        ctx.target()?;
        ctx.select_weighted()
    }

    fn on_idle_update(&mut self, _delta: f32, ctx: &mut HookContext<'_>) {
        let velocity = match (ctx.distance_to_target(), ctx.direction_to_target()) {
            (Some(distance), Some(direction)) if distance > CLEAVE_REACH => direction * self.drift_speed,
            _ => Vec3::ZERO,
        };

        ctx.emit(BehaviorSignal::Move { velocity });
    }

    fn on_idle_exit(&mut self, ctx: &mut HookContext<'_>) {
        ctx.emit(BehaviorSignal::Move { velocity: Vec3::ZERO });
    }
}
