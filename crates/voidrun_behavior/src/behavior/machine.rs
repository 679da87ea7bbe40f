//! Behavior state machine: health, decision loop, skill pipeline, stun,
//! idle monitor and death sequence of one entity.
//!
//! Все "корутины" оригинальной модели — явные таймеры, которые `tick`
//! продвигает раз в кадр в фиксированном порядке:
//!
//! 1. death sequence (если Dead — больше ничего не тикает)
//! 2. cooldowns
//! 3. stun timer
//! 4. skill pipeline
//! 5. decision loop
//! 6. idle monitor
//!
//! Hurt / Heal / ApplyStun можно вызывать в любой момент между тиками;
//! смерть применяется внутри самого вызова.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::death::{DeathSequence, DeathStep};
use super::events::BehaviorEvent;
use super::hooks::{BehaviorHooks, HookContext, HookRequest};
use super::idle::{IdleMonitor, IdleTransition};
use super::pipeline::{PipelineStep, SkillPipeline};
use super::state::BehaviorState;
use super::stun::StunTimer;
use crate::config::BehaviorConfig;
use crate::skills::{
    ActionContext, CooldownTracker, SkillDescriptor, SkillError, SkillHandle, SkillId, SkillRegistry,
};

/// Seed used when neither the config nor the spawning world provides one.
pub const FALLBACK_SEED: u64 = 42;

/// Engine state shared with hooks through [`HookContext`].
pub struct BehaviorCore {
    pub(crate) label: String,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) state: BehaviorState,
    pub(crate) decision_interval: f32,
    decision_elapsed: f32,
    decision_loop_running: bool,
    auto_dispose_on_death: bool,
    pub(crate) skills: SkillRegistry,
    cooldowns: CooldownTracker,
    pub(crate) pipeline: Option<SkillPipeline>,
    stun: StunTimer,
    idle: IdleMonitor,
    death: DeathSequence,
    disposal_requested: bool,
    seeded: bool,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) position: Vec3,
    pub(crate) target: Option<Vec3>,
    pub(crate) outbox: Vec<BehaviorEvent>,
    pub(crate) pending: Vec<HookRequest>,
}

impl BehaviorCore {
    fn set_state(&mut self, next: BehaviorState) {
        if self.state == next {
            return;
        }

        let from = self.state;
        self.state = next;
        self.outbox.push(BehaviorEvent::StateChanged { from, to: next });
        crate::log(&format!("{}: {} → {}", self.label, from.as_str(), next.as_str()));
    }
}

/// Behavior component: engine + hooks of one entity.
///
/// Требует Transform: позиция синхронизируется в `sync_behavior_targets`.
#[derive(Component)]
#[require(Transform)]
pub struct Behavior {
    core: BehaviorCore,
    hooks: Box<dyn BehaviorHooks>,
}

impl Behavior {
    pub fn new(config: &BehaviorConfig, hooks: impl BehaviorHooks) -> Self {
        Self::with_boxed_hooks(config, Box::new(hooks))
    }

    pub fn with_boxed_hooks(config: &BehaviorConfig, hooks: Box<dyn BehaviorHooks>) -> Self {
        let decision_interval = if config.decision_interval.is_finite() && config.decision_interval > 0.0 {
            config.decision_interval
        } else {
            crate::log_warning(&format!(
                "decision interval {} invalid, using default",
                config.decision_interval
            ));
            BehaviorConfig::default().decision_interval
        };

        if config.max_health == 0 {
            crate::log_warning("max health 0: entity dies on its first tick");
        }

        Self {
            core: BehaviorCore {
                label: "Enemy".to_string(),
                health: config.max_health,
                max_health: config.max_health,
                state: BehaviorState::Idle,
                decision_interval,
                // Первое решение — на первом же тике
                decision_elapsed: decision_interval,
                decision_loop_running: config.auto_start,
                auto_dispose_on_death: config.auto_dispose_on_death,
                skills: SkillRegistry::new(),
                cooldowns: CooldownTracker::new(),
                pipeline: None,
                stun: StunTimer::default(),
                idle: IdleMonitor::default(),
                death: DeathSequence::default(),
                disposal_requested: false,
                seeded: config.seed.is_some(),
                rng: ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(FALLBACK_SEED)),
                position: Vec3::ZERO,
                target: None,
                outbox: Vec::new(),
                pending: Vec::new(),
            },
            hooks,
        }
    }

    /// Name used in log lines.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.core.label = label.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.core.rng = ChaCha8Rng::seed_from_u64(seed);
        self.core.seeded = true;
    }

    /// No explicit seed yet (config had none and nothing reseeded us).
    pub fn needs_seed(&self) -> bool {
        !self.core.seeded
    }

    pub fn register_skill(&mut self, skill: SkillDescriptor) -> Result<SkillId, SkillError> {
        self.core.skills.register(skill)
    }

    // ===================== read access =====================

    pub fn label(&self) -> &str {
        &self.core.label
    }

    pub fn health(&self) -> u32 {
        self.core.health
    }

    pub fn max_health(&self) -> u32 {
        self.core.max_health
    }

    pub fn state(&self) -> BehaviorState {
        self.core.state
    }

    pub fn is_dead(&self) -> bool {
        self.core.state.is_dead()
    }

    pub fn decision_interval(&self) -> f32 {
        self.core.decision_interval
    }

    pub fn is_decision_loop_running(&self) -> bool {
        self.core.decision_loop_running
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.core.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillRegistry {
        &mut self.core.skills
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.core.cooldowns
    }

    /// Running-skill context: the skill and whether its body already fired.
    pub fn running_skill(&self) -> Option<(&SkillHandle, bool)> {
        self.core
            .pipeline
            .as_ref()
            .map(|pipeline| (pipeline.skill(), pipeline.body_executed()))
    }

    pub fn stun_remaining(&self) -> Option<f32> {
        self.core.stun.remaining()
    }

    pub fn is_idle_monitor_running(&self) -> bool {
        self.core.idle.is_running()
    }

    pub fn is_death_sequence_finished(&self) -> bool {
        self.core.death.is_finished()
    }

    pub fn is_disposal_requested(&self) -> bool {
        self.core.disposal_requested
    }

    pub fn position(&self) -> Vec3 {
        self.core.position
    }

    pub fn target(&self) -> Option<Vec3> {
        self.core.target
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.core.position = position;
    }

    /// `None` = no opponent available.
    pub fn set_target(&mut self, target: Option<Vec3>) {
        self.core.target = target;
    }

    pub fn pending_events(&self) -> &[BehaviorEvent] {
        &self.core.outbox
    }

    pub fn drain_events(&mut self) -> Vec<BehaviorEvent> {
        std::mem::take(&mut self.core.outbox)
    }

    // ===================== mutation entry points =====================

    pub fn hurt(&mut self, damage: u32) {
        if self.core.state.is_dead() {
            return;
        }

        self.core.health = self.core.health.saturating_sub(damage);
        if self.core.health == 0 {
            self.die();
        }
    }

    pub fn heal(&mut self, amount: u32) {
        if self.core.state.is_dead() {
            return;
        }

        self.core.health = self.core.health.saturating_add(amount).min(self.core.max_health);
    }

    pub fn apply_stun(&mut self, duration: f32, interrupt_current_skill: bool) {
        self.stun(duration, interrupt_current_skill);
        self.flush_requests();
    }

    pub fn set_max_health(&mut self, max_health: u32, full_health: bool) {
        if self.core.state.is_dead() {
            return;
        }

        self.core.max_health = max_health;
        self.core.health = if full_health {
            max_health
        } else {
            self.core.health.min(max_health)
        };

        if self.core.health == 0 {
            self.die();
        }
    }

    pub fn start_decision_loop(&mut self) {
        if self.core.state.is_dead() || self.core.decision_loop_running {
            return;
        }

        self.core.decision_loop_running = true;
        self.core.decision_elapsed = self.core.decision_interval;
    }

    // ===================== frame tick =====================

    pub fn tick(&mut self, delta: f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };

        if self.core.state.is_dead() {
            self.advance_death(delta);
            return;
        }

        if self.core.health == 0 {
            self.die();
            return;
        }

        self.advance_cooldowns(delta);
        self.advance_stun(delta);
        self.advance_pipeline(delta);
        self.advance_decision(delta);
        self.observe_idle(delta);
    }

    fn advance_cooldowns(&mut self, delta: f32) {
        let core = &mut self.core;
        for id in core.cooldowns.tick(&mut core.skills, delta) {
            if let Some(skill) = core.skills.get(id) {
                let name = skill.handle(id).name;
                core.outbox.push(BehaviorEvent::CooldownReady { skill: name });
            }
        }
    }

    fn advance_stun(&mut self, delta: f32) {
        if !self.core.stun.tick(delta) {
            return;
        }

        self.core.set_state(BehaviorState::Idle);
        self.core.outbox.push(BehaviorEvent::StunEnded);
        crate::log(&format!("{}: stun ended", self.core.label));
    }

    fn advance_pipeline(&mut self, delta: f32) {
        let Some(pipeline) = self.core.pipeline.as_mut() else {
            return;
        };

        match pipeline.advance(delta) {
            PipelineStep::Waiting => {}
            PipelineStep::PreDelayElapsed => self.execute_skill_body(),
            PipelineStep::PostDelayElapsed => self.finish_skill(),
        }
    }

    fn advance_decision(&mut self, delta: f32) {
        if !self.core.decision_loop_running || !self.core.state.can_decide() {
            return;
        }

        self.core.decision_elapsed += delta;
        if self.core.decision_elapsed < self.core.decision_interval {
            return;
        }

        self.core.decision_elapsed = 0.0;
        self.run_decision_cycle();
    }

    fn observe_idle(&mut self, delta: f32) {
        match self.core.idle.observe(self.core.state) {
            IdleTransition::Entered => {
                self.call_hook(|hooks, ctx| hooks.on_idle_enter(ctx));
                self.call_hook(|hooks, ctx| hooks.on_idle_update(delta, ctx));
            }
            IdleTransition::Stayed => {
                self.call_hook(|hooks, ctx| hooks.on_idle_update(delta, ctx));
            }
            IdleTransition::Exited => {
                self.call_hook(|hooks, ctx| hooks.on_idle_exit(ctx));
            }
            IdleTransition::Outside => {}
        }

        self.flush_requests();
    }

    // ===================== decision =====================

    fn run_decision_cycle(&mut self) {
        self.core.set_state(BehaviorState::Deciding);

        self.call_hook(|hooks, ctx| hooks.adjust_skill_weights(ctx));
        if !self.still_deciding() {
            return;
        }

        let forced = self.call_hook(|hooks, ctx| hooks.forced_skill(ctx));
        if !self.still_deciding() {
            return;
        }

        let forced = forced.filter(|&id| self.accept_choice(id, "forced"));
        let chosen = match forced {
            Some(id) => Some(id),
            None => {
                let selected = self.call_hook(|hooks, ctx| hooks.select_skill(ctx));
                if !self.still_deciding() {
                    return;
                }
                selected.filter(|&id| self.accept_choice(id, "selected"))
            }
        };

        match chosen {
            Some(id) => self.start_skill(id),
            None => self.core.set_state(BehaviorState::Idle),
        }
    }

    /// Applies hook requests; `false` if they moved us out of Deciding.
    fn still_deciding(&mut self) -> bool {
        self.flush_requests();
        self.core.state == BehaviorState::Deciding
    }

    /// A hook may only hand back a usable skill.
    fn accept_choice(&self, id: SkillId, source: &str) -> bool {
        if self.core.skills.can_use(id) {
            return true;
        }

        let name = self.core.skills.get(id).map_or("<unknown>", SkillDescriptor::name);
        crate::log_warning(&format!(
            "{}: {} skill '{}' is not usable, ignored",
            self.core.label, source, name
        ));
        false
    }

    // ===================== skill pipeline =====================

    fn start_skill(&mut self, id: SkillId) {
        let Some(skill) = self.core.skills.get(id).map(|descriptor| descriptor.handle(id)) else {
            self.core.set_state(BehaviorState::Idle);
            return;
        };

        if let Some(previous) = self.core.pipeline.take() {
            crate::log_warning(&format!(
                "{}: '{}' started while '{}' was running; previous pipeline dropped",
                self.core.label,
                skill.name,
                previous.skill().name
            ));
        }

        self.core.set_state(BehaviorState::Acting);
        self.core.pipeline = Some(SkillPipeline::new(skill.clone()));
        self.core.outbox.push(BehaviorEvent::SkillStarted {
            skill: skill.name.clone(),
        });
        crate::log(&format!("{}: skill '{}' started", self.core.label, skill.name));

        let wait = self.call_hook(|hooks, ctx| hooks.on_skill_pre(&skill, ctx));
        self.flush_requests();

        let Some(pipeline) = self.core.pipeline.as_mut() else {
            return;
        };

        let wait = sanitize_wait(wait);
        if wait > 0.0 {
            pipeline.wait_pre_delay(wait);
        } else {
            self.execute_skill_body();
        }
    }

    fn execute_skill_body(&mut self) {
        let Some(skill) = self.core.pipeline.as_ref().map(|pipeline| pipeline.skill().clone()) else {
            return;
        };

        self.call_hook(|hooks, ctx| hooks.on_skill_will_execute(&skill, ctx));
        self.flush_requests();
        if self.core.pipeline.is_none() {
            return;
        }

        {
            let core = &mut self.core;
            let mut action_ctx = ActionContext::new(core.position, core.target, &mut core.outbox);
            core.skills.invoke(skill.id, &mut action_ctx);
        }

        if let Some(pipeline) = self.core.pipeline.as_mut() {
            pipeline.mark_body_executed();
        }
        self.core.outbox.push(BehaviorEvent::SkillBodyExecuted {
            skill: skill.name.clone(),
        });

        self.call_hook(|hooks, ctx| hooks.on_skill_body_executed(&skill, ctx));

        // Кулдаун взводится при выполнении body, даже если дальше нас прервут
        {
            let core = &mut self.core;
            core.cooldowns.arm(&mut core.skills, skill.id);
        }

        self.flush_requests();
        if self.core.pipeline.is_none() {
            return;
        }

        let wait = self.call_hook(|hooks, ctx| hooks.on_skill_post(&skill, ctx));
        self.flush_requests();

        let Some(pipeline) = self.core.pipeline.as_mut() else {
            return;
        };

        let wait = sanitize_wait(wait);
        if wait > 0.0 {
            pipeline.wait_post_delay(wait);
        } else {
            self.finish_skill();
        }
    }

    fn finish_skill(&mut self) {
        let Some(skill) = self.core.pipeline.as_ref().map(|pipeline| pipeline.skill().clone()) else {
            return;
        };

        if matches!(self.core.state, BehaviorState::Dead | BehaviorState::Stunned) {
            self.core.outbox.push(BehaviorEvent::SkillAbandoned {
                skill: skill.name.clone(),
            });
            crate::log(&format!("{}: skill '{}' finished while stunned", self.core.label, skill.name));
        } else {
            self.core.set_state(BehaviorState::Idle);
            self.core.outbox.push(BehaviorEvent::SkillCompleted {
                skill: skill.name.clone(),
            });
            crate::log(&format!("{}: skill '{}' completed", self.core.label, skill.name));
            self.call_hook(|hooks, ctx| hooks.on_skill_complete(&skill, ctx));
        }

        self.core.pipeline = None;
        self.flush_requests();
    }

    /// Cancels the running pipeline and fires the interruption hook once.
    fn interrupt_pipeline(&mut self) {
        let Some(pipeline) = self.core.pipeline.take() else {
            return;
        };

        let skill = pipeline.skill().clone();
        let body_executed = pipeline.body_executed();

        self.core.outbox.push(BehaviorEvent::SkillInterrupted {
            skill: skill.name.clone(),
            body_executed,
        });
        crate::log(&format!(
            "{}: skill '{}' interrupted (body executed: {})",
            self.core.label, skill.name, body_executed
        ));

        self.call_hook(|hooks, ctx| hooks.on_skill_interrupted(&skill, body_executed, ctx));
    }

    // ===================== stun =====================

    fn stun(&mut self, duration: f32, interrupt_current_skill: bool) {
        if self.core.state.is_dead() {
            return;
        }

        if interrupt_current_skill {
            self.interrupt_pipeline();
        }

        let duration = self.core.stun.start(duration);
        self.core.set_state(BehaviorState::Stunned);
        self.core.outbox.push(BehaviorEvent::Stunned { duration });
        crate::log_info(&format!("{}: stunned for {:.2}s", self.core.label, duration));
    }

    fn flush_requests(&mut self) {
        while !self.core.pending.is_empty() {
            let requests = std::mem::take(&mut self.core.pending);
            for request in requests {
                match request {
                    HookRequest::Stun {
                        duration,
                        interrupt_current_skill,
                    } => self.stun(duration, interrupt_current_skill),
                }
            }
        }
    }

    // ===================== death =====================

    fn die(&mut self) {
        if self.core.state.is_dead() {
            return;
        }

        self.core.health = 0;
        self.core.set_state(BehaviorState::Dead);

        // Всё останавливаем до die effect: никто не должен воскресить entity
        let interrupted = self.core.pipeline.take();
        self.core.stun.cancel();
        self.core.decision_loop_running = false;
        let was_idle = self.core.idle.terminate();

        self.core.outbox.push(BehaviorEvent::Died);
        crate::log_info(&format!("💀 {}: died", self.core.label));

        if let Some(pipeline) = interrupted {
            let skill = pipeline.skill().clone();
            let body_executed = pipeline.body_executed();
            self.core.outbox.push(BehaviorEvent::SkillInterrupted {
                skill: skill.name.clone(),
                body_executed,
            });
            self.call_hook(|hooks, ctx| hooks.on_skill_interrupted(&skill, body_executed, ctx));
        }

        if was_idle {
            self.call_hook(|hooks, ctx| hooks.on_idle_exit(ctx));
        }

        let duration = self.call_hook(|hooks, ctx| hooks.begin_die_effect(ctx));
        self.core.pending.clear();

        let duration = sanitize_wait(duration);
        self.core.death.begin(duration);
        if duration <= 0.0 {
            self.finish_death();
        }
    }

    fn advance_death(&mut self, delta: f32) {
        match self.core.death.advance(delta) {
            DeathStep::Inactive => {}
            DeathStep::Running => {
                self.call_hook(|hooks, ctx| hooks.update_die_effect(delta, ctx));
            }
            DeathStep::Elapsed => {
                self.call_hook(|hooks, ctx| hooks.update_die_effect(delta, ctx));
                self.finish_death();
            }
        }
        self.core.pending.clear();
    }

    fn finish_death(&mut self) {
        self.core.death.finish();
        self.call_hook(|hooks, ctx| hooks.finish_die_effect(ctx));
        self.core.pending.clear();

        if self.core.auto_dispose_on_death && !self.hooks.manages_own_disposal() {
            self.core.disposal_requested = true;
            self.core.outbox.push(BehaviorEvent::DisposeRequested);
            crate::log(&format!("{}: dispose requested", self.core.label));
        }
    }

    fn call_hook<R>(&mut self, f: impl FnOnce(&mut dyn BehaviorHooks, &mut HookContext<'_>) -> R) -> R {
        let mut ctx = HookContext::new(&mut self.core);
        f(self.hooks.as_mut(), &mut ctx)
    }
}

fn sanitize_wait(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}
