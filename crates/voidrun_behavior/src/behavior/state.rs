//! Behavior FSM состояния.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Exactly one state per entity. `Dead` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Ждём следующего цикла решения
    #[default]
    Idle,

    /// Transient: выбор скилла внутри одного тика
    Deciding,

    /// Skill pipeline активен
    Acting,

    /// Оглушён, решения не принимаются
    Stunned,

    /// Терминальное состояние
    Dead,
}

impl BehaviorState {
    pub fn is_dead(self) -> bool {
        self == Self::Dead
    }

    /// Decision loop may run a cycle from this state.
    pub fn can_decide(self) -> bool {
        matches!(self, Self::Idle | Self::Deciding)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Deciding => "Deciding",
            Self::Acting => "Acting",
            Self::Stunned => "Stunned",
            Self::Dead => "Dead",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(BehaviorState::default(), BehaviorState::Idle);
    }

    #[test]
    fn test_only_idle_and_deciding_can_decide() {
        assert!(BehaviorState::Idle.can_decide());
        assert!(BehaviorState::Deciding.can_decide());
        assert!(!BehaviorState::Acting.can_decide());
        assert!(!BehaviorState::Stunned.can_decide());
        assert!(!BehaviorState::Dead.can_decide());
    }
}
