//! Movement target modes and attack-mode policy.

/// What a movement task is for.  Decides what happens on arrival.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetMode {
    /// Plain relocation; stop on arrival.
    #[default]
    Move,
    /// Approach a target entity in order to engage it.
    AttackApproach,
    /// Walk to a carrier and board it.
    EnterCarrier,
    /// Walk to a portal and be teleported to its exit.
    EnterPortal,
}

impl TargetMode {
    /// `true` for modes whose arrival behaviour depends on a target entity.
    #[inline]
    pub fn needs_target(self) -> bool {
        !matches!(self, TargetMode::Move)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetMode::Move           => "move",
            TargetMode::AttackApproach => "attack",
            TargetMode::EnterCarrier   => "enter_carrier",
            TargetMode::EnterPortal    => "enter_portal",
        }
    }
}

impl std::fmt::Display for TargetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy governing whether an attack-approach request may assign a first
/// target, change an existing one, or must respect a pre-assignment.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackMode {
    /// Agents already bound to a different target are left alone.
    KeepAssigned,
    /// Agents may switch targets unless their current one was explicitly assigned.
    AllowChange,
    /// Any capable agent is (re)targeted.
    #[default]
    Unrestricted,
    /// Only agents explicitly assigned to this very target act.
    AssignedOnly,
}

impl AttackMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AttackMode::KeepAssigned => "keep_assigned",
            AttackMode::AllowChange  => "allow_change",
            AttackMode::Unrestricted => "unrestricted",
            AttackMode::AssignedOnly => "assigned_only",
        }
    }
}

impl std::fmt::Display for AttackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
