//! Skills: descriptors, registry (weighted selection), cooldowns.

pub mod cooldown;
pub mod descriptor;
pub mod registry;


pub use cooldown::CooldownTracker;
pub use descriptor::{ActionContext, SkillAction, SkillDescriptor, SkillHandle, SkillId};
pub use registry::{SkillError, SkillRegistry};
