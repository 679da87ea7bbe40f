//! Behavior configuration: per-entity settings + TOML enemy profiles.
//!
//! Профиль хранит только данные (timing, веса). Действия скиллов
//! привязываются по имени архетипом, который использует профиль.

use serde::{Deserialize, Serialize};

use crate::skills::{SkillDescriptor, SkillError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("profile parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("decision interval must be positive, got {0}")]
    InvalidDecisionInterval(f32),

    #[error("max health must be at least 1")]
    ZeroMaxHealth,

    #[error("skill `{skill}`: {field} must be a non-negative number, got {value}")]
    NegativeTiming {
        skill: String,
        field: &'static str,
        value: f32,
    },

    #[error("skill `{0}` is listed more than once")]
    DuplicateSkill(String),

    #[error("profile has no skill named `{0}`")]
    MissingSkill(String),

    #[error(transparent)]
    Skill(#[from] SkillError),
}

/// Per-entity engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub max_health: u32,
    /// Seconds between decision cycles
    pub decision_interval: f32,
    /// Запускать decision loop сразу при спавне
    pub auto_start: bool,
    /// Despawn после death effect
    pub auto_dispose_on_death: bool,
    /// `None` = seed из DeterministicRng мира
    pub seed: Option<u64>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            max_health: 50,
            decision_interval: 0.4,
            auto_start: true,
            auto_dispose_on_death: true,
            seed: None,
        }
    }
}

impl BehaviorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }

        if !(self.decision_interval.is_finite() && self.decision_interval > 0.0) {
            return Err(ConfigError::InvalidDecisionInterval(self.decision_interval));
        }

        Ok(())
    }
}

/// Timing data of one skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub pre_delay: f32,
    #[serde(default)]
    pub post_delay: f32,
    #[serde(default)]
    pub cooldown: f32,
}

fn default_weight() -> u32 {
    1
}

impl SkillConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: 1,
            pre_delay: 0.0,
            post_delay: 0.0,
            cooldown: 0.0,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_timing(mut self, pre_delay: f32, post_delay: f32, cooldown: f32) -> Self {
        self.pre_delay = pre_delay;
        self.post_delay = post_delay;
        self.cooldown = cooldown;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pre_delay", self.pre_delay),
            ("post_delay", self.post_delay),
            ("cooldown", self.cooldown),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeTiming {
                    skill: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        Ok(())
    }

    /// Applies weight and timing to a descriptor that already carries the action.
    pub fn apply(&self, descriptor: SkillDescriptor) -> SkillDescriptor {
        descriptor
            .weight(self.weight)
            .pre_delay(self.pre_delay)
            .post_delay(self.post_delay)
            .cooldown(self.cooldown)
    }
}

/// Engine settings + skill table of one enemy kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnemyProfile {
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default, rename = "skill")]
    pub skills: Vec<SkillConfig>,
}

impl EnemyProfile {
    /// Parses and validates a profile.
    ///
    /// ```toml
    /// [behavior]
    /// max_health = 80
    /// decision_interval = 0.5
    ///
    /// [[skill]]
    /// name = "Cleave"
    /// weight = 3
    /// pre_delay = 0.4
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let profile: EnemyProfile = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.behavior.validate()?;

        for (index, skill) in self.skills.iter().enumerate() {
            skill.validate()?;
            if self.skills[..index].iter().any(|other| other.name == skill.name) {
                return Err(ConfigError::DuplicateSkill(skill.name.clone()));
            }
        }

        Ok(())
    }

    pub fn skill(&self, name: &str) -> Option<&SkillConfig> {
        self.skills.iter().find(|skill| skill.name == name)
    }

    pub fn require_skill(&self, name: &str) -> Result<&SkillConfig, ConfigError> {
        self.skill(name)
            .ok_or_else(|| ConfigError::MissingSkill(name.to_string()))
    }
}
