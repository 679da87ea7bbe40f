//! Idle monitor: enter / stay / exit detection, decoupled from transitions.
//!
//! Наблюдает state раз в кадр (после decision loop). Переходные состояния
//! внутри одного тика (Idle → Deciding → Idle) не видны — span не рвётся.

use super::state::BehaviorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTransition {
    /// Первый кадр в Idle (enter + update)
    Entered,
    /// Продолжаем стоять в Idle (update)
    Stayed,
    /// Первый кадр вне Idle (exit)
    Exited,
    /// Вне Idle или монитор остановлен
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleMonitor {
    was_idle: bool,
    running: bool,
}

impl Default for IdleMonitor {
    fn default() -> Self {
        Self {
            was_idle: false,
            running: true,
        }
    }
}

impl IdleMonitor {
    pub fn observe(&mut self, state: BehaviorState) -> IdleTransition {
        if !self.running {
            return IdleTransition::Outside;
        }

        match (state == BehaviorState::Idle, self.was_idle) {
            (true, false) => {
                self.was_idle = true;
                IdleTransition::Entered
            }
            (true, true) => IdleTransition::Stayed,
            (false, true) => {
                self.was_idle = false;
                IdleTransition::Exited
            }
            (false, false) => IdleTransition::Outside,
        }
    }

    /// Stops the monitor for good. Returns whether an idle span was open
    /// (the caller owes one exit notification).
    pub fn terminate(&mut self) -> bool {
        let was_idle = self.running && self.was_idle;
        self.running = false;
        self.was_idle = false;
        was_idle
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_idle(&self) -> bool {
        self.was_idle
    }
}
