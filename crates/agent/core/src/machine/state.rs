//! Combat states and the rules that select them.

/// The single active combat state.
///
/// There is no transition table: every state is reachable from every other
/// state on any tick, decided solely by that tick's inputs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatState {
    #[default]
    Idle,
    Searching,
    Approaching,
    Combat,
    Looting,
    Healing,
    Kiting,
    Aoe,
    Avoiding,
}

/// Which rule produced a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum DecisionReason {
    /// Player barely moved while approaching; jump to get unstuck.
    Stuck,
    /// Player is too close to a danger zone.
    EscapeDanger,
    Heal,
    /// Engaged target is beyond max attack range.
    Approach,
    /// Engaged target is inside min attack range.
    Kite,
    AreaAttack,
    Attack,
    /// Engaged target is in range but every eligible skill is cooling down.
    Cooldown,
    Loot,
    /// Nothing to fight.
    Search,
    /// Only grouped enemies visible; wait for isolated ones.
    WaitForIsolated,
    Idle,
}
