//! Behavior events — всё, что движок сообщает внешним коллабораторам.
//!
//! Два направления:
//! - `BehaviorEvent` (outbox движка) → `BehaviorNotice` (Bevy event с Entity)
//! - `BehaviorRequest` (damage sources, stun sources) → движок

use std::sync::Arc;

use bevy::prelude::*;

use super::state::BehaviorState;

/// Abstract signals for collaborators (physics, VFX, projectiles, damage).
///
/// The engine never interprets them.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorSignal {
    /// Нанести урон текущей цели
    DealDamage { amount: u32 },

    /// Визуальный/звуковой эффект в точке
    SpawnEffect { name: String, position: Vec3 },

    /// Снаряд из `origin` в направлении `direction`
    SpawnProjectile {
        origin: Vec3,
        direction: Vec3,
        speed: f32,
    },

    /// Желаемая скорость (ZERO = остановиться)
    Move { velocity: Vec3 },

    /// Импульс
    ApplyForce { direction: Vec3, strength: f32 },
}

/// Lifecycle notices and collaborator signals, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorEvent {
    StateChanged {
        from: BehaviorState,
        to: BehaviorState,
    },
    SkillStarted {
        skill: Arc<str>,
    },
    SkillBodyExecuted {
        skill: Arc<str>,
    },
    SkillCompleted {
        skill: Arc<str>,
    },
    SkillInterrupted {
        skill: Arc<str>,
        body_executed: bool,
    },
    /// Pipeline finished while the entity was stunned without interruption.
    SkillAbandoned {
        skill: Arc<str>,
    },
    CooldownReady {
        skill: Arc<str>,
    },
    Stunned {
        duration: f32,
    },
    StunEnded,
    Died,
    DisposeRequested,
    Signal(BehaviorSignal),
}

/// `BehaviorEvent` of a concrete entity (published every fixed tick).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BehaviorNotice {
    pub entity: Entity,
    pub event: BehaviorEvent,
}

/// Mutation entry points for external systems.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum BehaviorRequest {
    Hurt {
        entity: Entity,
        damage: u32,
    },
    Heal {
        entity: Entity,
        amount: u32,
    },
    Stun {
        entity: Entity,
        duration: f32,
        interrupt_current_skill: bool,
    },
}

impl BehaviorRequest {
    pub fn entity(&self) -> Entity {
        match self {
            Self::Hurt { entity, .. } | Self::Heal { entity, .. } | Self::Stun { entity, .. } => *entity,
        }
    }
}
