//! Skill execution pipeline (pre-delay → body → post-delay).
//!
//! По аналогии с MeleeAttackState (windup → active → recovery):
//! фаза + оставшееся время, продвигается раз в тик. Body выполняется
//! машиной между фазами; отмена = `Option::take()` у владельца.

use crate::skills::SkillHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelinePhase {
    /// Wind-up: body ещё не выполнен
    PreDelay { remaining: f32 },
    /// Recovery: body выполнен
    PostDelay { remaining: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Waiting,
    PreDelayElapsed,
    PostDelayElapsed,
}

/// Running-skill context: which skill, and whether its body already fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillPipeline {
    skill: SkillHandle,
    body_executed: bool,
    phase: PipelinePhase,
}

impl SkillPipeline {
    pub fn new(skill: SkillHandle) -> Self {
        Self {
            skill,
            body_executed: false,
            phase: PipelinePhase::PreDelay { remaining: 0.0 },
        }
    }

    pub fn skill(&self) -> &SkillHandle {
        &self.skill
    }

    pub fn body_executed(&self) -> bool {
        self.body_executed
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    pub fn wait_pre_delay(&mut self, seconds: f32) {
        self.phase = PipelinePhase::PreDelay { remaining: seconds };
    }

    pub fn mark_body_executed(&mut self) {
        self.body_executed = true;
    }

    pub fn wait_post_delay(&mut self, seconds: f32) {
        self.phase = PipelinePhase::PostDelay { remaining: seconds };
    }

    pub fn advance(&mut self, delta: f32) -> PipelineStep {
        match &mut self.phase {
            PipelinePhase::PreDelay { remaining } => {
                *remaining -= delta;
                if *remaining > 0.0 {
                    PipelineStep::Waiting
                } else {
                    PipelineStep::PreDelayElapsed
                }
            }
            PipelinePhase::PostDelay { remaining } => {
                *remaining -= delta;
                if *remaining > 0.0 {
                    PipelineStep::Waiting
                } else {
                    PipelineStep::PostDelayElapsed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillId;

    fn handle() -> SkillHandle {
        SkillHandle {
            id: SkillId(0),
            name: "Strike".into(),
            pre_delay: 0.5,
            post_delay: 0.25,
            cooldown: 0.0,
        }
    }

    #[test]
    fn test_phases_advance_in_order() {
        let mut pipeline = SkillPipeline::new(handle());
        pipeline.wait_pre_delay(0.5);

        assert_eq!(pipeline.advance(0.25), PipelineStep::Waiting);
        assert_eq!(pipeline.advance(0.25), PipelineStep::PreDelayElapsed);
        assert!(!pipeline.body_executed());

        pipeline.mark_body_executed();
        pipeline.wait_post_delay(0.25);
        assert_eq!(pipeline.phase(), PipelinePhase::PostDelay { remaining: 0.25 });
        assert_eq!(pipeline.advance(0.25), PipelineStep::PostDelayElapsed);
        assert!(pipeline.body_executed());
    }
}
