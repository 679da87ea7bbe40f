//! Diagnostics test
//!
//! Logger глобальный на процесс: каждый тест ставит свой MemoryLogger
//! под общим lock, чтобы строки не смешивались.
//!
//! Проверяем:
//! - Предупреждения движка и реестра скиллов доходят до logger
//! - LogLevel отсекает строки ниже порога

use std::sync::Mutex;

use voidrun_behavior::*;

static LOGGER_GUARD: Mutex<()> = Mutex::new(());

/// Helper: свежий MemoryLogger на уровне Debug, держим guard до конца теста
fn capture<T>(test: impl FnOnce(&MemoryLogger) -> T) -> T {
    let _guard = LOGGER_GUARD.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let memory = MemoryLogger::new();
    set_logger(Box::new(memory.clone()));
    set_log_level(LogLevel::Debug);

    test(&memory)
}

fn config() -> BehaviorConfig {
    BehaviorConfig {
        max_health: 50,
        decision_interval: 0.5,
        seed: Some(7),
        ..Default::default()
    }
}

const DT: f32 = 0.25;

struct ForceNamed(&'static str);

impl BehaviorHooks for ForceNamed {
    fn forced_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        ctx.skill_id(self.0)
    }
}

struct SelectNamed(&'static str);

impl BehaviorHooks for SelectNamed {
    fn select_skill(&mut self, ctx: &mut HookContext<'_>) -> Option<SkillId> {
        ctx.skill_id(self.0)
    }
}

#[test]
fn test_zero_weight_warns() {
    capture(|memory| {
        let skill = SkillDescriptor::with_action("Jab", |_| {}).weight(0);

        assert_eq!(skill.current_weight(), 1);
        assert!(memory.contains("[WARNING]"));
        assert!(memory.contains("Skill 'Jab': weight 0 clamped to 1"));
    });
}

#[test]
fn test_actionless_skill_warns_on_register() {
    capture(|memory| {
        let mut registry = SkillRegistry::new();
        registry.register(SkillDescriptor::new("Taunt")).unwrap();

        assert!(memory.contains("Skill 'Taunt' registered without an action"));
    });
}

#[test]
fn test_unusable_forced_skill_warns() {
    capture(|memory| {
        let mut behavior = Behavior::new(&config(), ForceNamed("Heavy")).with_label("Thorn");
        behavior.register_skill(SkillDescriptor::with_action("Light", |_| {})).unwrap();
        behavior
            .register_skill(SkillDescriptor::with_action("Heavy", |_| {}).cooldown(100.0))
            .unwrap();

        // Первый цикл берёт Heavy, дальше он на cooldown
        for _ in 0..8 {
            behavior.tick(DT);
        }

        assert!(memory.contains("Thorn: forced skill 'Heavy' is not usable, ignored"));
    });
}

#[test]
fn test_unusable_selected_skill_warns() {
    capture(|memory| {
        let mut behavior = Behavior::new(&config(), SelectNamed("Taunt")).with_label("Thorn");
        behavior.register_skill(SkillDescriptor::new("Taunt")).unwrap();

        behavior.tick(DT);

        assert_eq!(behavior.state(), BehaviorState::Idle);
        assert!(memory.contains("Thorn: selected skill 'Taunt' is not usable, ignored"));
    });
}

#[test]
fn test_lingering_pipeline_drop_warns() {
    capture(|memory| {
        let mut behavior = Behavior::new(&config(), DefaultHooks).with_label("Thorn");
        behavior
            .register_skill(
                SkillDescriptor::with_action("Strike", |_| {})
                    .pre_delay(0.5)
                    .post_delay(0.5),
            )
            .unwrap();

        behavior.tick(DT);
        // Короткий stun без прерывания, pipeline продолжает идти
        behavior.apply_stun(DT, false);
        behavior.tick(DT);
        assert!(!memory.contains("previous pipeline dropped"));

        behavior.tick(DT);

        assert!(memory.contains("Thorn: 'Strike' started while 'Strike' was running; previous pipeline dropped"));
    });
}

#[test]
fn test_zero_max_health_warns() {
    capture(|memory| {
        let config = BehaviorConfig {
            max_health: 0,
            ..config()
        };
        let mut behavior = Behavior::new(&config, DefaultHooks);

        assert!(memory.contains("max health 0"));

        behavior.tick(DT);
        assert!(behavior.is_dead());
    });
}

#[test]
fn test_log_level_drops_lower_lines() {
    capture(|memory| {
        set_log_level(LogLevel::Warning);

        log("debug line");
        log_info("info line");
        log_warning("warning line");
        log_error("error line");

        set_log_level(LogLevel::Debug);

        let lines = memory.lines();
        assert_eq!(lines.len(), 2, "unexpected lines: {:?}", lines);
        assert!(memory.contains("[WARNING]"));
        assert!(memory.contains("warning line"));
        assert!(memory.contains("[ERROR]"));
        assert!(memory.contains("error line"));
        assert!(!memory.contains("debug line"));
        assert!(!memory.contains("info line"));
    });
}
