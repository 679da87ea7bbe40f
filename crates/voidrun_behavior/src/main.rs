//! Headless симуляция VOIDRUN behavior
//!
//! Спавнит трёх эталонных врагов против неподвижной цели, наносит им
//! периодический урон и печатает lifecycle события.

use bevy::prelude::*;
use voidrun_behavior::archetypes::{bloom_king, brute, skirmisher};
use voidrun_behavior::{
    create_headless_app, BehaviorEvent, BehaviorNotice, BehaviorRequest, BehaviorSignal, BehaviorTarget,
    ConfigError,
};

/// Скорость из последнего `Move` сигнала (демо-"физика")
#[derive(Component, Default)]
struct DemoVelocity(Vec3);

/// Цель для врагов
#[derive(Component)]
struct DemoTarget;

fn main() -> Result<(), ConfigError> {
    let seed = 42;
    println!("Starting VOIDRUN headless behavior simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_systems(
        FixedUpdate,
        (apply_demo_signals, integrate_demo_velocity, hurt_enemies_periodically)
            .chain()
            .after(voidrun_behavior::behavior::publish_behavior_events),
    );

    let world = app.world_mut();
    let target = world.spawn((DemoTarget, Transform::from_xyz(0.0, 0.0, 0.0))).id();

    let enemies = [
        (brute::build(&brute::profile())?, Vec3::new(8.0, 0.0, 0.0)),
        (skirmisher::build(&skirmisher::profile())?, Vec3::new(-12.0, 0.0, 3.0)),
        (bloom_king::build(&bloom_king::profile())?, Vec3::new(0.0, 0.0, 10.0)),
    ];

    for (behavior, position) in enemies {
        world.spawn((
            behavior,
            BehaviorTarget::new(target),
            DemoVelocity::default(),
            Transform::from_translation(position),
        ));
    }

    // 60 секунд симуляции
    for tick in 0..3600 {
        app.update();

        if tick % 600 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
    Ok(())
}

fn apply_demo_signals(mut notices: EventReader<BehaviorNotice>, mut velocities: Query<&mut DemoVelocity>) {
    for notice in notices.read() {
        match &notice.event {
            BehaviorEvent::Signal(BehaviorSignal::Move { velocity }) => {
                if let Ok(mut current) = velocities.get_mut(notice.entity) {
                    current.0 = *velocity;
                }
            }
            BehaviorEvent::Signal(BehaviorSignal::DealDamage { amount }) => {
                println!("{:?} hits the target for {}", notice.entity, amount);
            }
            BehaviorEvent::Signal(_) | BehaviorEvent::StateChanged { .. } | BehaviorEvent::CooldownReady { .. } => {}
            other => println!("{:?}: {:?}", notice.entity, other),
        }
    }
}

fn integrate_demo_velocity(
    mut bodies: Query<(&DemoVelocity, &mut Transform), Without<DemoTarget>>,
    time: Res<Time<Fixed>>,
) {
    for (velocity, mut transform) in bodies.iter_mut() {
        transform.translation += velocity.0 * time.delta_secs();
    }
}

/// Каждые 2 секунды: 9 урона каждому врагу
fn hurt_enemies_periodically(
    mut ticks: Local<u32>,
    enemies: Query<Entity, With<BehaviorTarget>>,
    mut requests: EventWriter<BehaviorRequest>,
) {
    *ticks += 1;
    if *ticks % 120 != 0 {
        return;
    }

    for entity in enemies.iter() {
        requests.write(BehaviorRequest::Hurt { entity, damage: 9 });
    }
}
