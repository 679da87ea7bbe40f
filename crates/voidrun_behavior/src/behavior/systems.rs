//! Behavior ECS systems (FixedUpdate, chained).

use bevy::prelude::*;

use super::events::{BehaviorEvent, BehaviorNotice, BehaviorRequest};
use super::machine::Behavior;
use crate::DeterministicRng;

/// Opponent of a behavior entity (target position query).
///
/// `None` или despawned entity = цели нет.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorTarget {
    pub entity: Option<Entity>,
}

impl BehaviorTarget {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity: Some(entity),
        }
    }
}

/// Система: seed для новых Behavior без явного seed
///
/// Берёт seed из DeterministicRng (если resource есть), иначе остаётся
/// fallback seed движка.
pub fn seed_spawned_behaviors(
    mut spawned: Query<&mut Behavior, Added<Behavior>>,
    rng: Option<ResMut<DeterministicRng>>,
) {
    let Some(mut rng) = rng else {
        return;
    };

    for mut behavior in spawned.iter_mut() {
        if behavior.needs_seed() {
            let seed = rng.next_seed();
            behavior.reseed(seed);
        }
    }
}

/// Система: Transform entity + Transform цели → движок
pub fn sync_behavior_targets(
    mut behaviors: Query<(&Transform, Option<&BehaviorTarget>, &mut Behavior)>,
    transforms: Query<&Transform>,
) {
    for (transform, target, mut behavior) in behaviors.iter_mut() {
        if behavior.is_dead() {
            continue;
        }

        let target_position = target
            .and_then(|target| target.entity)
            .and_then(|entity| transforms.get(entity).ok())
            .map(|transform| transform.translation);

        behavior.set_position(transform.translation);
        behavior.set_target(target_position);
    }
}

/// Система: Hurt / Heal / Stun requests → движок
pub fn apply_behavior_requests(
    mut requests: EventReader<BehaviorRequest>,
    mut behaviors: Query<&mut Behavior>,
) {
    for request in requests.read() {
        let Ok(mut behavior) = behaviors.get_mut(request.entity()) else {
            crate::log(&format!(
                "BehaviorRequest for {:?} ignored (no Behavior)",
                request.entity()
            ));
            continue;
        };

        match *request {
            BehaviorRequest::Hurt { damage, .. } => behavior.hurt(damage),
            BehaviorRequest::Heal { amount, .. } => behavior.heal(amount),
            BehaviorRequest::Stun {
                duration,
                interrupt_current_skill,
                ..
            } => behavior.apply_stun(duration, interrupt_current_skill),
        }
    }
}

/// Система: один tick движка на fixed step
pub fn tick_behaviors(mut behaviors: Query<&mut Behavior>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut behavior in behaviors.iter_mut() {
        behavior.tick(delta);
    }
}

/// Система: outbox движка → BehaviorNotice events, despawn после смерти
pub fn publish_behavior_events(
    mut commands: Commands,
    mut behaviors: Query<(Entity, &mut Behavior)>,
    mut notices: EventWriter<BehaviorNotice>,
) {
    for (entity, mut behavior) in behaviors.iter_mut() {
        if behavior.pending_events().is_empty() {
            continue;
        }

        let mut dispose = false;
        for event in behavior.drain_events() {
            dispose |= event == BehaviorEvent::DisposeRequested;
            notices.write(BehaviorNotice { entity, event });
        }

        if dispose {
            crate::log(&format!("🗑️ {:?} ({}) despawned", entity, behavior.label()));
            commands.entity(entity).despawn();
        }
    }
}
