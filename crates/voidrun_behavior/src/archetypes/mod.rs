//! Reference enemies built on `BehaviorHooks`.
//!
//! Каждый архетип = hooks struct + профиль по умолчанию + `build(profile)`.
//! Профиль задаёт timing/веса, действия привязываются по имени скилла.

use bevy::prelude::*;

use crate::behavior::Behavior;
use crate::config::{ConfigError, EnemyProfile};
use crate::skills::{ActionContext, SkillDescriptor, SkillId};

pub mod bloom_king;
pub mod brute;
pub mod skirmisher;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod archetypes_tests;

pub use bloom_king::BloomKingHooks;
pub use brute::BruteHooks;
pub use skirmisher::SkirmisherHooks;

/// Registers the profile entry `name` with the given action.
pub(crate) fn register_profile_skill<F>(
    behavior: &mut Behavior,
    profile: &EnemyProfile,
    name: &str,
    action: F,
) -> Result<SkillId, ConfigError>
where
    F: FnMut(&mut ActionContext<'_>) + Send + Sync + 'static,
{
    let config = profile.require_skill(name)?;
    let descriptor = config.apply(SkillDescriptor::with_action(name, action));
    Ok(behavior.register_skill(descriptor)?)
}

/// Profile entries the archetype has no action for.
pub(crate) fn warn_unknown_skills(label: &str, profile: &EnemyProfile, known: &[&str]) {
    for skill in profile.skills.iter().filter(|skill| !known.contains(&skill.name.as_str())) {
        crate::log_warning(&format!(
            "{}: profile skill '{}' has no action, skipped",
            label, skill.name
        ));
    }
}

/// Velocity toward `goal` that never overshoots it within one frame.
pub(crate) fn seek_velocity(from: Vec3, goal: Vec3, speed: f32, delta: f32) -> Vec3 {
    let offset = goal - from;
    if delta <= 0.0 {
        return offset.normalize_or_zero() * speed;
    }

    offset.clamp_length_max(speed * delta) / delta
}
