//! VOIDRUN Behavior Core
//!
//! Cooperative behavior engine для автономных врагов на Bevy 0.16:
//! decision loop, weighted skill selection, skill pipeline
//! (pre-delay → body → post-delay), cooldowns, stun, idle monitor,
//! death sequence.
//!
//! Рендер, физика и снаряды — внешние коллабораторы: движок только
//! публикует `BehaviorNotice` (сигналы + lifecycle) и принимает
//! `BehaviorRequest` (Hurt / Heal / Stun).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod archetypes;
pub mod behavior;
pub mod config;
pub mod logger;
pub mod skills;

// Re-export базовых типов для удобства
pub use behavior::{
    Behavior, BehaviorEvent, BehaviorHooks, BehaviorNotice, BehaviorPlugin, BehaviorRequest, BehaviorSignal,
    BehaviorState, BehaviorTarget, DefaultHooks, HookContext,
};
pub use config::{BehaviorConfig, ConfigError, EnemyProfile, SkillConfig};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger, LogLevel,
    LogPrinter, MemoryLogger,
};
pub use skills::{ActionContext, SkillDescriptor, SkillError, SkillHandle, SkillId, SkillRegistry};

/// Simulation tick (60Hz).
pub const FIXED_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            // Детерминистичный RNG (seed по умолчанию)
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для behavior tick
            .insert_resource(Time::<Fixed>::from_duration(FIXED_FRAME))
            .add_plugins(BehaviorPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Раздаёт seeds новым `Behavior` без явного seed (в порядке спавна).
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `update()` = ровно один fixed tick
/// (первый update — нулевой delta, без тика).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_FRAME))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot всех Behavior для сравнения детерминизма
pub fn behavior_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &Behavior)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, behavior) in entities {
        let running = behavior
            .running_skill()
            .map(|(skill, body_executed)| format!("{}:{}", skill.name, body_executed))
            .unwrap_or_default();

        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(
            format!(
                "{}|{}|{}|{}|{:?}",
                behavior.label(),
                behavior.state().as_str(),
                behavior.health(),
                running,
                behavior.position()
            )
            .as_bytes(),
        );
    }

    snapshot
}
