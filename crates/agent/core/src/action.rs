//! Actions emitted by the decision core.
//!
//! Positions are in frame space; the actuation boundary maps them into
//! normalized coordinates before sending.

use crate::geometry::Point;

#[derive(Clone, Debug, PartialEq, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum AgentAction {
    /// Trigger a skill by its keybind.
    UseSkill { skill_id: String, key: String },
    /// Move the character toward a point.
    MoveToward { target: Point },
    /// Press a raw key token (e.g. jump).
    PressKey { key: String },
    /// Walk to a loot detection and pick it up.
    CollectLoot { target: Point, key: String },
    /// Do nothing this tick.
    Wait,
}

impl AgentAction {
    pub fn skill_id(&self) -> Option<&str> {
        match self {
            AgentAction::UseSkill { skill_id, .. } => Some(skill_id),
            _ => None,
        }
    }

    /// Snake-case variant name, for logs.
    pub fn label(&self) -> &str {
        self.as_ref()
    }

    pub fn is_wait(&self) -> bool {
        matches!(self, AgentAction::Wait)
    }
}
