/// Running counters, reset only by an explicit engine reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub ticks: u64,
    /// Approximate: counts enemy ids that vanished between ticks, which also
    /// happens on occlusion or when an enemy leaves the frame.
    pub kills: u64,
    pub skills_used: u64,
    pub area_hits: u64,
    pub dangers_avoided: u64,
    pub stuck_recoveries: u64,
    pub state_changes: u64,
    /// Timestamp of the most recent state change.
    pub last_transition_ms: Option<u64>,
}
