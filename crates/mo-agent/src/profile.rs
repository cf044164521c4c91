//! Static per-entity attributes.

use mo_core::Vec3;

/// What an entity is.  Decides engagement range class and enter protocol.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// A mobile unit.
    #[default]
    Unit,
    /// A static building.
    Structure,
    /// A mobile transport that embarks up to `capacity` units.
    Carrier { capacity: u32 },
    /// A static teleportation node; entering agents reappear at `exit`.
    Portal { exit: Vec3 },
}

impl EntityKind {
    /// `true` when attackers should use their structure range against it.
    #[inline]
    pub fn is_structure_class(self) -> bool {
        matches!(self, EntityKind::Structure | EntityKind::Portal { .. })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Unit          => "unit",
            EntityKind::Structure     => "structure",
            EntityKind::Carrier { .. } => "carrier",
            EntityKind::Portal { .. }  => "portal",
        }
    }
}

/// How an agent moves.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocomotionProfile {
    /// Top speed, units per second.  `0.0` means the entity cannot move.
    pub max_speed: f32,
    /// Speed gained (or lost) per second.
    pub acceleration: f32,
    /// Turn rate, radians per second.
    pub angular_speed: f32,
    /// Must face the next waypoint before advancing (cannot strafe).
    pub requires_facing: bool,
    /// Flies; keeps its altitude instead of following terrain height.
    pub airborne: bool,
}

impl LocomotionProfile {
    /// Foot soldier: quick to turn, may strafe.
    pub fn infantry() -> Self {
        Self {
            max_speed:       3.0,
            acceleration:    12.0,
            angular_speed:   8.0,
            requires_facing: false,
            airborne:        false,
        }
    }

    /// Tracked vehicle: slow to turn, must face before driving.
    pub fn vehicle() -> Self {
        Self {
            max_speed:       4.5,
            acceleration:    4.0,
            angular_speed:   2.5,
            requires_facing: true,
            airborne:        false,
        }
    }

    pub fn stationary() -> Self {
        Self {
            max_speed:       0.0,
            acceleration:    0.0,
            angular_speed:   0.0,
            requires_facing: false,
            airborne:        false,
        }
    }

    #[inline]
    pub fn can_move(&self) -> bool {
        self.max_speed > 0.0
    }
}

impl Default for LocomotionProfile {
    fn default() -> Self {
        Self::infantry()
    }
}

/// How an agent fights.  Ranges are surface-to-surface distances.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatProfile {
    pub can_attack:      bool,
    pub unit_range:      f32,
    pub structure_range: f32,
}

impl CombatProfile {
    pub fn melee() -> Self {
        Self { can_attack: true, unit_range: 0.5, structure_range: 0.5 }
    }

    pub fn ranged(range: f32) -> Self {
        Self { can_attack: true, unit_range: range, structure_range: range }
    }

    /// Engagement range against an entity of the given kind.
    #[inline]
    pub fn range_against(&self, kind: EntityKind) -> f32 {
        if kind.is_structure_class() { self.structure_range } else { self.unit_range }
    }
}
