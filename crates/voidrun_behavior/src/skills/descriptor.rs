//! Skill descriptor: one selectable action with its timing parameters.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;

use crate::behavior::{BehaviorEvent, BehaviorSignal};

/// Index of a skill inside its entity's registry (registration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct SkillId(pub(crate) usize);

impl SkillId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Body of a skill. Runs once per execution, between WillExecute and BodyExecuted hooks.
pub type SkillAction = Box<dyn FnMut(&mut ActionContext<'_>) + Send + Sync>;

/// What a skill action can see and do.
///
/// Actions never touch the entity state directly: they only read positions and
/// push signals for external collaborators (damage, effects, movement).
pub struct ActionContext<'a> {
    position: Vec3,
    target: Option<Vec3>,
    outbox: &'a mut Vec<BehaviorEvent>,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(position: Vec3, target: Option<Vec3>, outbox: &'a mut Vec<BehaviorEvent>) -> Self {
        Self {
            position,
            target,
            outbox,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.target.map(|target| self.position.distance(target))
    }

    /// Unit direction to the target; `None` when there is no target or it overlaps us.
    pub fn direction_to_target(&self) -> Option<Vec3> {
        self.target
            .map(|target| target - self.position)
            .filter(|offset| offset.length_squared() > 1e-4)
            .map(|offset| offset.normalize())
    }

    pub fn emit(&mut self, signal: BehaviorSignal) {
        self.outbox.push(BehaviorEvent::Signal(signal));
    }
}

/// Immutable timing snapshot of a registered skill, handed to hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillHandle {
    pub id: SkillId,
    pub name: Arc<str>,
    pub pre_delay: f32,
    pub post_delay: f32,
    pub cooldown: f32,
}

impl SkillHandle {
    pub fn is(&self, name: &str) -> bool {
        &*self.name == name
    }
}

/// Registered skill.
///
/// Timings are fixed after construction. `weight` may be rewritten every
/// decision cycle (including 0 to forbid the skill); `on_cooldown` belongs to
/// the cooldown tracker.
pub struct SkillDescriptor {
    name: Arc<str>,
    action: Option<SkillAction>,
    weight: u32,
    pre_delay: f32,
    post_delay: f32,
    cooldown: f32,
    on_cooldown: bool,
}

impl SkillDescriptor {
    /// Skill without a body. It stays registered but can never be used.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            action: None,
            weight: 1,
            pre_delay: 0.0,
            post_delay: 0.0,
            cooldown: 0.0,
            on_cooldown: false,
        }
    }

    pub fn with_action<F>(name: impl Into<Arc<str>>, action: F) -> Self
    where
        F: FnMut(&mut ActionContext<'_>) + Send + Sync + 'static,
    {
        Self {
            action: Some(Box::new(action)),
            ..Self::new(name)
        }
    }

    /// Base weight. Values below 1 are clamped to 1.
    pub fn weight(mut self, weight: u32) -> Self {
        if weight == 0 {
            crate::log_warning(&format!("Skill '{}': weight 0 clamped to 1", self.name));
        }
        self.weight = weight.max(1);
        self
    }

    pub fn pre_delay(mut self, seconds: f32) -> Self {
        self.pre_delay = sanitize_timing(&self.name, "pre_delay", seconds);
        self
    }

    pub fn post_delay(mut self, seconds: f32) -> Self {
        self.post_delay = sanitize_timing(&self.name, "post_delay", seconds);
        self
    }

    pub fn cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = sanitize_timing(&self.name, "cooldown", seconds);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_weight(&self) -> u32 {
        self.weight
    }

    /// Per-cycle weight override (0 forbids the skill until rewritten).
    pub fn set_weight(&mut self, weight: u32) {
        self.weight = weight;
    }

    pub fn pre_delay_secs(&self) -> f32 {
        self.pre_delay
    }

    pub fn post_delay_secs(&self) -> f32 {
        self.post_delay
    }

    pub fn cooldown_secs(&self) -> f32 {
        self.cooldown
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn on_cooldown(&self) -> bool {
        self.on_cooldown
    }

    /// Has a body and is not cooling down.
    pub fn can_use(&self) -> bool {
        self.action.is_some() && !self.on_cooldown
    }

    pub fn handle(&self, id: SkillId) -> SkillHandle {
        SkillHandle {
            id,
            name: Arc::clone(&self.name),
            pre_delay: self.pre_delay,
            post_delay: self.post_delay,
            cooldown: self.cooldown,
        }
    }

    pub(crate) fn set_on_cooldown(&mut self, on_cooldown: bool) {
        self.on_cooldown = on_cooldown;
    }

    pub(crate) fn invoke(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        match self.action.as_mut() {
            Some(action) => {
                action(ctx);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for SkillDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillDescriptor")
            .field("name", &self.name)
            .field("has_action", &self.action.is_some())
            .field("weight", &self.weight)
            .field("pre_delay", &self.pre_delay)
            .field("post_delay", &self.post_delay)
            .field("cooldown", &self.cooldown)
            .field("on_cooldown", &self.on_cooldown)
            .finish()
    }
}

fn sanitize_timing(skill: &str, field: &str, seconds: f32) -> f32 {
    if seconds.is_finite() && seconds >= 0.0 {
        seconds
    } else {
        crate::log_warning(&format!("Skill '{}': {} {} clamped to 0", skill, field, seconds));
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_clamped_to_one() {
        let skill = SkillDescriptor::with_action("Slash", |_| {}).weight(0);
        assert_eq!(skill.current_weight(), 1);
    }

    #[test]
    fn test_negative_timings_clamped() {
        let skill = SkillDescriptor::with_action("Slash", |_| {})
            .pre_delay(-1.0)
            .post_delay(f32::NAN)
            .cooldown(2.0);

        assert_eq!(skill.pre_delay_secs(), 0.0);
        assert_eq!(skill.post_delay_secs(), 0.0);
        assert_eq!(skill.cooldown_secs(), 2.0);
    }

    #[test]
    fn test_actionless_skill_is_never_usable() {
        let mut skill = SkillDescriptor::new("Placeholder").weight(10);
        assert!(!skill.has_action());
        assert!(!skill.can_use());

        let mut outbox = Vec::new();
        let mut ctx = ActionContext::new(Vec3::ZERO, None, &mut outbox);
        assert!(!skill.invoke(&mut ctx));
    }

    #[test]
    fn test_cooldown_flag_blocks_use() {
        let mut skill = SkillDescriptor::with_action("Slash", |_| {});
        assert!(skill.can_use());

        skill.set_on_cooldown(true);
        assert!(!skill.can_use());
    }

    #[test]
    fn test_action_emits_into_outbox() {
        let mut skill = SkillDescriptor::with_action("Bite", |ctx: &mut ActionContext<'_>| {
            if ctx.target().is_some() {
                ctx.emit(BehaviorSignal::DealDamage { amount: 3 });
            }
        });

        let mut outbox = Vec::new();
        let mut ctx = ActionContext::new(Vec3::ZERO, Some(Vec3::X), &mut outbox);
        assert!(skill.invoke(&mut ctx));
        assert_eq!(
            outbox,
            vec![BehaviorEvent::Signal(BehaviorSignal::DealDamage { amount: 3 })]
        );
    }

    #[test]
    fn test_direction_to_target() {
        let mut outbox = Vec::new();
        let ctx = ActionContext::new(Vec3::ZERO, Some(Vec3::new(3.0, 0.0, 4.0)), &mut outbox);
        assert_eq!(ctx.distance_to_target(), Some(5.0));
        let direction = ctx.direction_to_target().unwrap();
        assert!((direction - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);

        let mut outbox = Vec::new();
        let ctx = ActionContext::new(Vec3::ONE, Some(Vec3::ONE), &mut outbox);
        assert_eq!(ctx.direction_to_target(), None);
    }
}
