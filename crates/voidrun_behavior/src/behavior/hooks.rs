//! Extension hooks for concrete enemies.
//!
//! Every method has a default, so `impl BehaviorHooks for MyEnemy {}` is a
//! valid (if plain) enemy. Call order per decision cycle:
//!
//! 1. `adjust_skill_weights`
//! 2. `forced_skill` → if `None`, `select_skill`
//! 3. pipeline: `on_skill_pre` → `on_skill_will_execute` → action →
//!    `on_skill_body_executed` → `on_skill_post` → `on_skill_complete`
//!    (or `on_skill_interrupted` on stun/death)
//!
//! Idle monitor: `on_idle_enter` / `on_idle_update` / `on_idle_exit`.
//! Death: `begin_die_effect` → `update_die_effect`* → `finish_die_effect`.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::events::{BehaviorEvent, BehaviorSignal};
use super::machine::BehaviorCore;
use super::state::BehaviorState;
use crate::skills::{SkillHandle, SkillId, SkillRegistry};

pub trait BehaviorHooks: Send + Sync + 'static {
    /// Runs every cycle before forced-skill evaluation. Weight writes persist.
    fn adjust_skill_weights(&mut self, _ctx: &mut HookContext<'_>) {}

    /// Bypasses weighted selection for this cycle.
    fn forced_skill(&mut self, _ctx: &mut HookContext<'_>) -> Option<SkillId> {
        None
    }

    fn select_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        ctx.select_weighted()
    }

    /// Wind-up. Returns how long to wait before the body.
    fn on_skill_pre(&mut self, skill: &SkillHandle, _ctx: &mut HookContext<'_>) -> f32 {
        skill.pre_delay
    }

    fn on_skill_will_execute(&mut self, _skill: &SkillHandle, _ctx: &mut HookContext<'_>) {}

    fn on_skill_body_executed(&mut self, _skill: &SkillHandle, _ctx: &mut HookContext<'_>) {}

    /// Recovery. Returns how long to wait before completion.
    fn on_skill_post(&mut self, skill: &SkillHandle, _ctx: &mut HookContext<'_>) -> f32 {
        skill.post_delay
    }

    fn on_skill_complete(&mut self, _skill: &SkillHandle, _ctx: &mut HookContext<'_>) {}

    /// `body_executed` tells whether the action already fired.
    fn on_skill_interrupted(
        &mut self,
        _skill: &SkillHandle,
        _body_executed: bool,
        _ctx: &mut HookContext<'_>,
    ) {
    }

    fn on_idle_enter(&mut self, _ctx: &mut HookContext<'_>) {}

    fn on_idle_update(&mut self, _delta: f32, _ctx: &mut HookContext<'_>) {}

    fn on_idle_exit(&mut self, _ctx: &mut HookContext<'_>) {}

    /// Returns the die effect duration (0 = finish immediately).
    fn begin_die_effect(&mut self, _ctx: &mut HookContext<'_>) -> f32 {
        0.0
    }

    fn update_die_effect(&mut self, _delta: f32, _ctx: &mut HookContext<'_>) {}

    fn finish_die_effect(&mut self, _ctx: &mut HookContext<'_>) {}

    /// `true` = the entity removes itself; no dispose request is emitted.
    fn manages_own_disposal(&self) -> bool {
        false
    }
}

/// Hooks with every default. Plain weighted-random enemy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl BehaviorHooks for DefaultHooks {}

/// Requests a hook can make; applied by the machine right after the hook returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HookRequest {
    Stun {
        duration: f32,
        interrupt_current_skill: bool,
    },
}

/// Restricted view of the engine handed to hooks.
pub struct HookContext<'a> {
    core: &'a mut BehaviorCore,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(core: &'a mut BehaviorCore) -> Self {
        Self { core }
    }

    pub fn label(&self) -> &str {
        &self.core.label
    }

    pub fn health(&self) -> u32 {
        self.core.health
    }

    pub fn max_health(&self) -> u32 {
        self.core.max_health
    }

    pub fn state(&self) -> BehaviorState {
        self.core.state
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.core.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillRegistry {
        &mut self.core.skills
    }

    pub fn skill_id(&self, name: &str) -> Option<SkillId> {
        self.core.skills.find(name)
    }

    /// Default selection: weighted draw with the entity RNG.
    pub fn select_weighted(&mut self) -> Option<SkillId> {
        let core = &mut *self.core;
        core.skills.select_weighted(&mut core.rng)
    }

    pub fn running_skill(&self) -> Option<&SkillHandle> {
        self.core.pipeline.as_ref().map(|pipeline| pipeline.skill())
    }

    pub fn position(&self) -> Vec3 {
        self.core.position
    }

    pub fn target(&self) -> Option<Vec3> {
        self.core.target
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.core
            .target
            .map(|target| self.core.position.distance(target))
    }

    pub fn direction_to_target(&self) -> Option<Vec3> {
        self.core
            .target
            .map(|target| target - self.core.position)
            .filter(|offset| offset.length_squared() > 1e-4)
            .map(|offset| offset.normalize())
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.core.rng
    }

    pub fn emit(&mut self, signal: BehaviorSignal) {
        self.core.outbox.push(BehaviorEvent::Signal(signal));
    }

    pub fn decision_interval(&self) -> f32 {
        self.core.decision_interval
    }

    /// Non-positive values are ignored.
    pub fn set_decision_interval(&mut self, seconds: f32) {
        if seconds.is_finite() && seconds > 0.0 {
            self.core.decision_interval = seconds;
        } else {
            crate::log_warning(&format!(
                "{}: decision interval {} ignored",
                self.core.label, seconds
            ));
        }
    }

    /// Applied as soon as the hook returns.
    pub fn request_stun(&mut self, duration: f32, interrupt_current_skill: bool) {
        self.core.pending.push(HookRequest::Stun {
            duration,
            interrupt_current_skill,
        });
    }
}
