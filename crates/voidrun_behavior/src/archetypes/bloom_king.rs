//! Bloom King: boss with five skills.
//!
//! - Тяжёлые скиллы (RotatingBlades, CornerDashBees) не идут подряд:
//!   после тяжёлого body их вес = 0, лёгкий body снимает блокировку.
//! - HP ≤ 60% и ≤ 30%: одноразовый stun 4s, decision interval × 0.75.
//! - Idle: патруль к точке между собой и целью (35–60% пути), не дальше
//!   4.8 от цели.

use bevy::prelude::*;
use rand::Rng;

use super::{register_profile_skill, seek_velocity, warn_unknown_skills};
use crate::behavior::{Behavior, BehaviorHooks, BehaviorSignal, HookContext};
use crate::config::{BehaviorConfig, ConfigError, EnemyProfile, SkillConfig};
use crate::skills::{ActionContext, SkillHandle, SkillId};

pub const POLLEN_THORN: &str = "PollenThorn";
pub const ROTATING_BLADES: &str = "RotatingBlades";
pub const CROSS_TENTACLES: &str = "CrossTentacles";
pub const CORNER_DASH_BEES: &str = "CornerDashBees";
pub const POLLEN_FIELD: &str = "PollenField";

pub const HEAVY_SKILLS: [&str; 2] = [ROTATING_BLADES, CORNER_DASH_BEES];

const PHASE_STUN_DURATION: f32 = 4.0;
const PHASE_INTERVAL_FACTOR: f32 = 0.75;

const BLADES_RADIUS: f32 = 3.0;
const BLADES_DAMAGE: u32 = 8;
const TENTACLE_SPEED: f32 = 9.0;
const BEES_DASH_STRENGTH: f32 = 6.0;

pub fn profile() -> EnemyProfile {
    EnemyProfile {
        behavior: BehaviorConfig {
            max_health: 300,
            decision_interval: 1.2,
            ..Default::default()
        },
        skills: vec![
            SkillConfig::new(POLLEN_THORN).with_weight(3).with_timing(0.6, 0.6, 3.0),
            SkillConfig::new(ROTATING_BLADES).with_weight(2).with_timing(0.8, 0.6, 5.0),
            SkillConfig::new(CROSS_TENTACLES).with_weight(3).with_timing(0.5, 0.7, 4.0),
            SkillConfig::new(CORNER_DASH_BEES).with_weight(1).with_timing(0.8, 0.8, 8.0),
            SkillConfig::new(POLLEN_FIELD).with_weight(2).with_timing(0.6, 0.6, 6.0),
        ],
    }
}

pub fn build(profile: &EnemyProfile) -> Result<Behavior, ConfigError> {
    profile.validate()?;

    let heavy_base_weights = HEAVY_SKILLS
        .iter()
        .map(|&name| Ok((name, profile.require_skill(name)?.weight.max(1))))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let hooks = BloomKingHooks::new(heavy_base_weights);
    let mut behavior = Behavior::new(&profile.behavior, hooks).with_label("BloomKing");
    warn_unknown_skills(
        "BloomKing",
        profile,
        &[POLLEN_THORN, ROTATING_BLADES, CROSS_TENTACLES, CORNER_DASH_BEES, POLLEN_FIELD],
    );

    register_profile_skill(&mut behavior, profile, POLLEN_THORN, |ctx| {
        effect_at_target(ctx, "pollen_thorn");
    })?;

    register_profile_skill(&mut behavior, profile, ROTATING_BLADES, |ctx| {
        let position = ctx.position();
        ctx.emit(BehaviorSignal::SpawnEffect {
            name: "rotating_blades".to_string(),
            position,
        });

        if ctx.distance_to_target().is_some_and(|distance| distance <= BLADES_RADIUS) {
            ctx.emit(BehaviorSignal::DealDamage {
                amount: BLADES_DAMAGE,
            });
        }
    })?;

    register_profile_skill(&mut behavior, profile, CROSS_TENTACLES, |ctx| {
        let origin = ctx.position();
        for direction in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
            ctx.emit(BehaviorSignal::SpawnProjectile {
                origin,
                direction,
                speed: TENTACLE_SPEED,
            });
        }
    })?;

    register_profile_skill(&mut behavior, profile, CORNER_DASH_BEES, |ctx| {
        if let Some(direction) = ctx.direction_to_target() {
            ctx.emit(BehaviorSignal::ApplyForce {
                direction,
                strength: BEES_DASH_STRENGTH,
            });
        }
        effect_at_target(ctx, "pollen_bees");
    })?;

    register_profile_skill(&mut behavior, profile, POLLEN_FIELD, |ctx| {
        effect_at_target(ctx, "pollen_field");
    })?;

    Ok(behavior)
}

fn effect_at_target(ctx: &mut ActionContext<'_>, name: &str) {
    if let Some(position) = ctx.target() {
        ctx.emit(BehaviorSignal::SpawnEffect {
            name: name.to_string(),
            position,
        });
    }
}

#[derive(Debug, Clone)]
pub struct BloomKingHooks {
    heavy_base_weights: Vec<(&'static str, u32)>,
    heavy_locked: bool,
    stunned_at_60: bool,
    stunned_at_30: bool,
    patrol_target: Option<Vec3>,
    patrol_timer: f32,
    pub patrol_speed: f32,
    pub patrol_change_interval: f32,
    pub max_target_distance: f32,
}

impl BloomKingHooks {
    pub fn new(heavy_base_weights: Vec<(&'static str, u32)>) -> Self {
        Self {
            heavy_base_weights,
            heavy_locked: false,
            stunned_at_60: false,
            stunned_at_30: false,
            patrol_target: None,
            patrol_timer: 0.0,
            patrol_speed: 2.2,
            patrol_change_interval: 3.5,
            max_target_distance: 4.8,
        }
    }

    pub fn is_heavy(name: &str) -> bool {
        HEAVY_SKILLS.iter().any(|&heavy| heavy == name)
    }

    pub fn is_heavy_locked(&self) -> bool {
        self.heavy_locked
    }

    /// Не дальше `max_target_distance` от цели.
    fn clamp_to_target(&self, point: Vec3, target: Vec3) -> Vec3 {
        target + (point - target).clamp_length_max(self.max_target_distance)
    }

    fn pick_patrol_point(&self, position: Vec3, target: Vec3, ctx: &mut HookContext<'_>) -> Vec3 {
        let rng = ctx.rng();
        let bias: f32 = rng.gen_range(0.35..0.6);
        let radius: f32 = rng.gen_range(0.3..1.1) * 0.3;
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);

        let base = position.lerp(target, bias);
        let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * radius;
        self.clamp_to_target(base + offset, target)
    }
}

impl BehaviorHooks for BloomKingHooks {
    fn adjust_skill_weights(&mut self, ctx: &mut HookContext<'_>) {
        if !self.heavy_locked {
            return;
        }

        for (_, skill) in ctx.skills_mut().iter_mut() {
            if Self::is_heavy(skill.name()) {
                skill.set_weight(0);
            }
        }
    }

    /// Фазовые пороги: stun вместо скилла (cycle прерывается stun'ом).
    fn forced_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        let health = ctx.health() as f32;
        let max_health = ctx.max_health() as f32;

        for (threshold, done) in [(0.6, &mut self.stunned_at_60), (0.3, &mut self.stunned_at_30)] {
            if !*done && health <= max_health * threshold {
                *done = true;
                ctx.request_stun(PHASE_STUN_DURATION, true);
                let interval = ctx.decision_interval() * PHASE_INTERVAL_FACTOR;
                ctx.set_decision_interval(interval);
                crate::log_info(&format!(
                    "🌸 {}: phase threshold {:.0}% reached, interval → {:.2}s",
                    ctx.label(),
                    threshold * 100.0,
                    interval
                ));
            }
        }

        None
    }

    fn select_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        ctx.target()?;
        ctx.select_weighted()
    }

    fn on_skill_body_executed(&mut self, skill: &SkillHandle, ctx: &mut HookContext<'_>) {
        if Self::is_heavy(&skill.name) {
            self.heavy_locked = true;
            return;
        }

        if !self.heavy_locked {
            return;
        }

        self.heavy_locked = false;
        for &(name, weight) in &self.heavy_base_weights {
            if let Some(descriptor) = ctx.skills_mut().by_name_mut(name) {
                descriptor.set_weight(weight);
            }
        }
    }

    fn on_idle_update(&mut self, delta: f32, ctx: &mut HookContext<'_>) {
        let Some(target) = ctx.target() else {
            ctx.emit(BehaviorSignal::Move { velocity: Vec3::ZERO });
            return;
        };

        let position = ctx.position();
        self.patrol_timer += delta;

        let needs_new_point = match self.patrol_target {
            None => true,
            Some(point) => position.distance(point) < 0.25 || self.patrol_timer >= self.patrol_change_interval,
        };

        if needs_new_point {
            self.patrol_timer = 0.0;
            self.patrol_target = Some(self.pick_patrol_point(position, target, ctx));
        }

        let goal = self.clamp_to_target(self.patrol_target.unwrap_or(position), target);
        ctx.emit(BehaviorSignal::Move {
            velocity: seek_velocity(position, goal, self.patrol_speed, delta),
        });
    }

    fn on_idle_exit(&mut self, ctx: &mut HookContext<'_>) {
        ctx.emit(BehaviorSignal::Move { velocity: Vec3::ZERO });
    }
}
