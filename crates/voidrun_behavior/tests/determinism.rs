//! Тесты детерминизма
//!
//! Проверяем что симуляция с одинаковым seed даёт идентичные результаты:
//! seeds для Behavior раздаёт DeterministicRng, время ручное.

use bevy::prelude::*;
use voidrun_behavior::archetypes::{bloom_king, brute, skirmisher};
use voidrun_behavior::behavior::publish_behavior_events;
use voidrun_behavior::*;

#[derive(Resource, Default)]
struct Trace(Vec<String>);

fn record_notices(mut notices: EventReader<BehaviorNotice>, mut trace: ResMut<Trace>) {
    for notice in notices.read() {
        trace.0.push(format!("{}:{:?}", notice.entity.index(), notice.event));
    }
}

/// Периодический урон всем врагам (каждые 0.5s)
fn hurt_periodically(
    mut ticks: Local<u32>,
    enemies: Query<Entity, With<Behavior>>,
    mut requests: EventWriter<BehaviorRequest>,
) {
    *ticks += 1;
    if *ticks % 30 != 0 {
        return;
    }

    for entity in enemies.iter() {
        requests.write(BehaviorRequest::Hurt { entity, damage: 7 });
    }
}

fn run_simulation(seed: u64, tick_count: usize) -> (Vec<String>, Vec<u8>) {
    let mut app = create_headless_app(seed);
    app.init_resource::<Trace>().add_systems(
        FixedUpdate,
        (record_notices, hurt_periodically)
            .chain()
            .after(publish_behavior_events),
    );

    let world = app.world_mut();
    let target = world.spawn(Transform::default()).id();
    let enemies = [
        (brute::build(&brute::profile()).unwrap(), Vec3::new(2.0, 0.0, 0.0)),
        (skirmisher::build(&skirmisher::profile()).unwrap(), Vec3::new(7.0, 0.0, 0.0)),
        (skirmisher::build(&skirmisher::profile()).unwrap(), Vec3::new(0.0, 0.0, -1.5)),
        (bloom_king::build(&bloom_king::profile()).unwrap(), Vec3::new(-4.0, 0.0, 4.0)),
    ];
    for (behavior, position) in enemies {
        world.spawn((behavior, BehaviorTarget::new(target), Transform::from_translation(position)));
    }

    for _ in 0..tick_count {
        app.update();
    }

    let snapshot = behavior_snapshot(app.world_mut());
    let trace = std::mem::take(&mut app.world_mut().resource_mut::<Trace>().0);
    (trace, snapshot)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 1200;

    let (trace1, snapshot1) = run_simulation(SEED, TICK_COUNT);
    let (trace2, snapshot2) = run_simulation(SEED, TICK_COUNT);

    assert!(!trace1.is_empty());
    assert_eq!(trace1, trace2, "Симуляция с одинаковым seed ({}) дала разные события!", SEED);
    assert_eq!(snapshot1, snapshot2);
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 600;

    // Запускаем 3 раза — все должны быть идентичны
    let runs: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_enemies_eventually_die() {
    // 7 урона каждые 0.5s: brute (80 HP) умирает за ~6s
    let (trace, _) = run_simulation(42, 900);

    let deaths = trace.iter().filter(|line| line.ends_with(":Died")).count();
    assert!(deaths >= 3, "ожидали минимум 3 смерти, получили {}", deaths);
}
