//! Tests for reference archetypes (Brute, Skirmisher, BloomKing).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::archetypes::bloom_king::{self, BloomKingHooks};
    use crate::archetypes::skirmisher::{self, SkirmisherHooks};
    use crate::archetypes::brute;
    use crate::behavior::{Behavior, BehaviorEvent, BehaviorSignal, BehaviorState};
    use crate::config::{ConfigError, EnemyProfile};

    const DT: f32 = 0.1;

    fn with_target(mut behavior: Behavior, position: Vec3, target: Vec3) -> Behavior {
        behavior.set_position(position);
        behavior.set_target(Some(target));
        behavior.reseed(3);
        behavior
    }

    fn started_skills(events: &[BehaviorEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                BehaviorEvent::SkillStarted { skill } => Some(skill.to_string()),
                _ => None,
            })
            .collect()
    }

    fn last_move(events: &[BehaviorEvent]) -> Option<Vec3> {
        events.iter().rev().find_map(|e| match e {
            BehaviorEvent::Signal(BehaviorSignal::Move { velocity }) => Some(*velocity),
            _ => None,
        })
    }

    #[test]
    fn test_default_profiles_build() {
        assert_eq!(brute::build(&brute::profile()).unwrap().skills().len(), 1);
        assert_eq!(skirmisher::build(&skirmisher::profile()).unwrap().skills().len(), 2);
        assert_eq!(bloom_king::build(&bloom_king::profile()).unwrap().skills().len(), 5);
    }

    #[test]
    fn test_profile_missing_skill() {
        let mut profile = skirmisher::profile();
        profile.skills.retain(|skill| skill.name != skirmisher::DASH);

        assert!(matches!(
            skirmisher::build(&profile),
            Err(ConfigError::MissingSkill(name)) if name == skirmisher::DASH
        ));
    }

    #[test]
    fn test_profile_timing_from_toml() {
        let profile = EnemyProfile::from_toml_str(
            r#"
            [behavior]
            max_health = 120

            [[skill]]
            name = "Cleave"
            weight = 4
            pre_delay = 0.2
            cooldown = 9.0
            "#,
        )
        .unwrap();

        let behavior = brute::build(&profile).unwrap();
        let cleave = behavior.skills().iter().next().unwrap().1;

        assert_eq!(behavior.max_health(), 120);
        assert_eq!(cleave.current_weight(), 4);
        assert_eq!(cleave.pre_delay_secs(), 0.2);
        assert_eq!(cleave.cooldown_secs(), 9.0);
    }

    // ===================== Brute =====================

    #[test]
    fn test_brute_drifts_toward_far_target() {
        let config = EnemyProfile {
            behavior: crate::config::BehaviorConfig {
                auto_start: false,
                ..brute::profile().behavior
            },
            ..brute::profile()
        };
        let mut behavior = with_target(brute::build(&config).unwrap(), Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);

        behavior.tick(DT);
        let velocity = last_move(&behavior.drain_events()).unwrap();
        assert!(velocity.x < 0.0);

        behavior.set_position(Vec3::new(1.0, 0.0, 0.0));
        behavior.tick(DT);
        assert_eq!(last_move(&behavior.drain_events()), Some(Vec3::ZERO));
    }

    // ===================== Skirmisher =====================

    #[test]
    fn test_skirmisher_weights_by_distance() {
        assert_eq!(SkirmisherHooks::shoot_weight(12.0), 8);
        assert_eq!(SkirmisherHooks::shoot_weight(5.0), 5);
        assert_eq!(SkirmisherHooks::shoot_weight(1.0), 2);

        assert_eq!(SkirmisherHooks::dash_weight(3.0), 8);
        assert_eq!(SkirmisherHooks::dash_weight(7.0), 4);
        assert_eq!(SkirmisherHooks::dash_weight(15.0), 1);
    }

    #[test]
    fn test_skirmisher_adjusts_weights_each_cycle() {
        let mut behavior = with_target(
            skirmisher::build(&skirmisher::profile()).unwrap(),
            Vec3::new(12.0, 0.0, 0.0),
            Vec3::ZERO,
        );

        behavior.tick(DT);

        let weight = |name: &str| {
            let id = behavior.skills().find(name).unwrap();
            behavior.skills().get(id).unwrap().current_weight()
        };
        assert_eq!(weight(skirmisher::SHOOT), 8);
        assert_eq!(weight(skirmisher::DASH), 1);
    }

    #[test]
    fn test_skirmisher_forced_dash_when_close() {
        let mut behavior = with_target(
            skirmisher::build(&skirmisher::profile()).unwrap(),
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::ZERO,
        );

        behavior.tick(DT);

        assert_eq!(started_skills(&behavior.drain_events()), vec![skirmisher::DASH]);
    }

    #[test]
    fn test_skirmisher_without_target_idles() {
        let mut behavior = skirmisher::build(&skirmisher::profile()).unwrap();

        for _ in 0..50 {
            behavior.tick(DT);
        }

        assert!(started_skills(behavior.pending_events()).is_empty());
        assert_eq!(behavior.state(), BehaviorState::Idle);
    }

    #[test]
    fn test_skirmisher_idle_approach_stops_at_distance() {
        let mut profile = skirmisher::profile();
        profile.behavior.auto_start = false;
        let mut behavior = with_target(skirmisher::build(&profile).unwrap(), Vec3::new(9.0, 0.0, 0.0), Vec3::ZERO);

        behavior.tick(DT);
        let velocity = last_move(&behavior.drain_events()).unwrap();
        assert!((velocity.length() - 2.0).abs() < 1e-5);
        assert!(velocity.x < 0.0);

        behavior.set_position(Vec3::new(5.0, 0.0, 0.0));
        behavior.tick(DT);
        assert_eq!(last_move(&behavior.drain_events()), Some(Vec3::ZERO));
    }

    // ===================== BloomKing =====================

    #[test]
    fn test_bloom_king_heavy_skills_never_back_to_back() {
        let mut behavior = with_target(
            bloom_king::build(&bloom_king::profile()).unwrap(),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
        );

        for _ in 0..3000 {
            behavior.tick(DT);
        }

        let started = started_skills(behavior.pending_events());
        assert!(started.len() > 20);
        assert!(started.iter().any(|name| BloomKingHooks::is_heavy(name)));

        for pair in started.windows(2) {
            assert!(
                !(BloomKingHooks::is_heavy(&pair[0]) && BloomKingHooks::is_heavy(&pair[1])),
                "heavy skills back to back: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_bloom_king_phase_thresholds_fire_once() {
        let mut behavior = with_target(
            bloom_king::build(&bloom_king::profile()).unwrap(),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
        );

        // 300 → 75 (25%): оба порога в одном цикле
        behavior.hurt(225);
        behavior.tick(DT);

        assert_eq!(behavior.state(), BehaviorState::Stunned);
        assert!((behavior.decision_interval() - 1.2 * 0.75 * 0.75).abs() < 1e-5);
        assert!(started_skills(behavior.pending_events()).is_empty());

        // После стана пороги больше не срабатывают
        for _ in 0..100 {
            behavior.tick(DT);
        }
        let stuns = behavior
            .pending_events()
            .iter()
            .filter(|e| matches!(e, BehaviorEvent::Stunned { .. }))
            .count();
        assert_eq!(stuns, 2);
        assert!(!started_skills(behavior.pending_events()).is_empty());
    }

    #[test]
    fn test_bloom_king_patrol_stays_near_target() {
        let mut profile = bloom_king::profile();
        profile.behavior.auto_start = false;
        let target = Vec3::ZERO;
        let mut position = Vec3::new(3.0, 0.0, 0.0);
        let mut behavior = with_target(bloom_king::build(&profile).unwrap(), position, target);

        for _ in 0..600 {
            behavior.tick(DT);
            if let Some(velocity) = last_move(&behavior.drain_events()) {
                position += velocity * DT;
                behavior.set_position(position);
            }
            assert!(position.distance(target) <= 4.8 + 1e-3);
        }

        assert_ne!(position, Vec3::new(3.0, 0.0, 0.0));
    }
}
