//! Per-entity skill registry + default weighted selection.

use rand::Rng;

use super::descriptor::{ActionContext, SkillDescriptor, SkillId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkillError {
    /// Skill names are unique within one entity.
    #[error("skill `{0}` is already registered")]
    DuplicateName(String),
}

/// Ordered skill collection. Registration order is the selection walk order.
#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: Vec<SkillDescriptor>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, skill: SkillDescriptor) -> Result<SkillId, SkillError> {
        if self.find(skill.name()).is_some() {
            return Err(SkillError::DuplicateName(skill.name().to_string()));
        }

        if !skill.has_action() {
            crate::log_warning(&format!(
                "Skill '{}' registered without an action (never selectable)",
                skill.name()
            ));
        }

        self.skills.push(skill);
        Ok(SkillId(self.skills.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, id: SkillId) -> Option<&SkillDescriptor> {
        self.skills.get(id.0)
    }

    pub fn get_mut(&mut self, id: SkillId) -> Option<&mut SkillDescriptor> {
        self.skills.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<SkillId> {
        self.skills
            .iter()
            .position(|skill| skill.name() == name)
            .map(SkillId)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut SkillDescriptor> {
        self.skills.iter_mut().find(|skill| skill.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillId, &SkillDescriptor)> {
        self.skills
            .iter()
            .enumerate()
            .map(|(index, skill)| (SkillId(index), skill))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SkillId, &mut SkillDescriptor)> {
        self.skills
            .iter_mut()
            .enumerate()
            .map(|(index, skill)| (SkillId(index), skill))
    }

    pub fn can_use(&self, id: SkillId) -> bool {
        self.get(id).is_some_and(SkillDescriptor::can_use)
    }

    /// Sum of current weights over usable skills.
    pub fn usable_weight_sum(&self) -> u64 {
        self.skills
            .iter()
            .filter(|skill| skill.can_use())
            .map(|skill| u64::from(skill.current_weight()))
            .sum()
    }

    /// Cumulative-weight draw over usable skills.
    ///
    /// Returns `None` when no usable skill has a positive weight.
    pub fn select_weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SkillId> {
        let sum = self.usable_weight_sum();
        if sum == 0 {
            return None;
        }

        self.pick_from_roll(rng.gen_range(0..sum))
    }

    /// Walks usable skills in registration order, subtracting weights until
    /// `roll` falls inside a skill's span.
    pub fn pick_from_roll(&self, mut roll: u64) -> Option<SkillId> {
        for (id, skill) in self.iter() {
            if !skill.can_use() {
                continue;
            }

            let weight = u64::from(skill.current_weight());
            if roll < weight {
                return Some(id);
            }
            roll -= weight;
        }

        None
    }

    pub(crate) fn invoke(&mut self, id: SkillId, ctx: &mut ActionContext<'_>) -> bool {
        self.skills
            .get_mut(id.0)
            .is_some_and(|skill| skill.invoke(ctx))
    }
}
