//! Skirmisher: ranged enemy (Shoot + Dash).
//!
//! Веса зависят от дистанции до цели: далеко → стреляет, близко → рывок.
//! Цель ближе 2.0 → принудительный Dash (если доступен).
//! Смерть: покраснение + тряска 0.35s → взрыв.

use bevy::prelude::*;
use rand::Rng;

use super::{register_profile_skill, warn_unknown_skills};
use crate::behavior::{Behavior, BehaviorHooks, BehaviorSignal, HookContext};
use crate::config::{BehaviorConfig, ConfigError, EnemyProfile, SkillConfig};
use crate::skills::{SkillHandle, SkillId};

pub const SHOOT: &str = "Shoot";
pub const DASH: &str = "Dash";

const BULLET_SPEED: f32 = 12.0;
const DASH_DISTANCE: f32 = 4.0;
const DASH_TIME: f32 = 0.25;
const FORCED_DASH_DISTANCE: f32 = 2.0;

pub fn profile() -> EnemyProfile {
    EnemyProfile {
        behavior: BehaviorConfig::default(),
        skills: vec![
            SkillConfig::new(SHOOT).with_weight(5).with_timing(0.1, 0.05, 0.8),
            // Рывок длится весь post-delay
            SkillConfig::new(DASH).with_weight(2).with_timing(0.05, DASH_TIME, 3.0),
        ],
    }
}

pub fn build(profile: &EnemyProfile) -> Result<Behavior, ConfigError> {
    profile.validate()?;

    let mut behavior = Behavior::new(&profile.behavior, SkirmisherHooks::default()).with_label("Skirmisher");
    warn_unknown_skills("Skirmisher", profile, &[SHOOT, DASH]);

    register_profile_skill(&mut behavior, profile, SHOOT, |ctx| {
        let Some(direction) = ctx.direction_to_target() else {
            return;
        };

        let origin = ctx.position();
        ctx.emit(BehaviorSignal::SpawnProjectile {
            origin,
            direction,
            speed: BULLET_SPEED,
        });
    })?;

    let dash_time = profile.require_skill(DASH)?.post_delay.max(f32::EPSILON);
    register_profile_skill(&mut behavior, profile, DASH, move |ctx| {
        let Some(direction) = ctx.direction_to_target() else {
            return;
        };

        ctx.emit(BehaviorSignal::Move {
            velocity: direction * (DASH_DISTANCE / dash_time),
        });
    })?;

    Ok(behavior)
}

#[derive(Debug, Clone)]
pub struct SkirmisherHooks {
    pub approach_speed: f32,
    pub approach_stop_distance: f32,
    pub shake_duration: f32,
    pub shake_intensity: f32,
}

impl Default for SkirmisherHooks {
    fn default() -> Self {
        Self {
            approach_speed: 2.0,
            approach_stop_distance: 6.0,
            shake_duration: 0.35,
            shake_intensity: 0.25,
        }
    }
}

impl SkirmisherHooks {
    pub fn shoot_weight(distance: f32) -> u32 {
        if distance > 8.0 {
            8
        } else if distance > 3.5 {
            5
        } else {
            2
        }
    }

    pub fn dash_weight(distance: f32) -> u32 {
        if distance < 5.5 {
            8
        } else if distance < 10.0 {
            4
        } else {
            1
        }
    }
}

impl BehaviorHooks for SkirmisherHooks {
    fn adjust_skill_weights(&mut self, ctx: &mut HookContext<'_>) {
        let Some(distance) = ctx.distance_to_target() else {
            return;
        };

        for (_, skill) in ctx.skills_mut().iter_mut() {
            match skill.name() {
                SHOOT => skill.set_weight(Self::shoot_weight(distance)),
                DASH => skill.set_weight(Self::dash_weight(distance)),
                _ => {}
            }
        }
    }

    fn forced_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        let distance = ctx.distance_to_target()?;
        if distance >= FORCED_DASH_DISTANCE {
            return None;
        }

        ctx.skill_id(DASH).filter(|&id| ctx.skills().can_use(id))
    }

    fn select_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        ctx.target()?;
        ctx.select_weighted()
    }

    fn on_skill_complete(&mut self, skill: &SkillHandle, ctx: &mut HookContext<'_>) {
        if skill.is(DASH) {
            ctx.emit(BehaviorSignal::Move { velocity: Vec3::ZERO });
        }
    }

    fn on_skill_interrupted(&mut self, skill: &SkillHandle, body_executed: bool, ctx: &mut HookContext<'_>) {
        // Рывок уже начался → гасим скорость
        if skill.is(DASH) && body_executed {
            ctx.emit(BehaviorSignal::Move { velocity: Vec3::ZERO });
        }
    }

    fn on_idle_update(&mut self, _delta: f32, ctx: &mut HookContext<'_>) {
        let velocity = match (ctx.distance_to_target(), ctx.direction_to_target()) {
            (Some(distance), Some(direction)) if distance > self.approach_stop_distance => {
                direction * self.approach_speed
            }
            _ => Vec3::ZERO,
        };

        ctx.emit(BehaviorSignal::Move { velocity });
    }

    fn on_idle_exit(&mut self, ctx: &mut HookContext<'_>) {
        ctx.emit(BehaviorSignal::Move { velocity: Vec3::ZERO });
    }

    fn begin_die_effect(&mut self, ctx: &mut HookContext<'_>) -> f32 {
        let position = ctx.position();
        ctx.emit(BehaviorSignal::Move { velocity: Vec3::ZERO });
        ctx.emit(BehaviorSignal::SpawnEffect {
            name: "tint_red".to_string(),
            position,
        });
        self.shake_duration
    }

    fn update_die_effect(&mut self, _delta: f32, ctx: &mut HookContext<'_>) {
        let angle = ctx.rng().gen_range(0.0..std::f32::consts::TAU);
        ctx.emit(BehaviorSignal::ApplyForce {
            direction: Vec3::new(angle.cos(), 0.0, angle.sin()),
            strength: self.shake_intensity,
        });
    }

    fn finish_die_effect(&mut self, ctx: &mut HookContext<'_>) {
        let position = ctx.position();
        ctx.emit(BehaviorSignal::SpawnEffect {
            name: "explosion".to_string(),
            position,
        });
    }
}
