//! Behavior engine module
//!
//! Cooperative scheduling одной сущности: decision loop, skill pipeline,
//! stun, idle monitor, death sequence. Конкретные враги — через
//! `BehaviorHooks` (см. `crate::archetypes`).

use bevy::prelude::*;

pub mod death;
pub mod events;
pub mod hooks;
pub mod idle;
pub mod machine;
pub mod pipeline;
pub mod state;
pub mod stun;
pub mod systems;


// Re-export основных типов
pub use events::{BehaviorEvent, BehaviorNotice, BehaviorRequest, BehaviorSignal};
pub use hooks::{BehaviorHooks, DefaultHooks, HookContext};
pub use machine::{Behavior, FALLBACK_SEED};
pub use state::BehaviorState;
pub use systems::{
    apply_behavior_requests, publish_behavior_events, seed_spawned_behaviors, sync_behavior_targets,
    tick_behaviors, BehaviorTarget,
};

/// Behavior Plugin
///
/// Регистрирует системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. seed_spawned_behaviors — seed RNG новых сущностей
/// 2. sync_behavior_targets — позиция entity и цели → движок
/// 3. apply_behavior_requests — Hurt / Heal / Stun
/// 4. tick_behaviors — таймеры, pipeline, decision loop, idle
/// 5. publish_behavior_events — outbox → BehaviorNotice, despawn
pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BehaviorRequest>()
            .add_event::<BehaviorNotice>()
            .add_systems(
                FixedUpdate,
                (
                    seed_spawned_behaviors,
                    sync_behavior_targets,
                    apply_behavior_requests,
                    tick_behaviors,
                    publish_behavior_events,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
