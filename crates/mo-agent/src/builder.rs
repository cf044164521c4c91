//! Fluent construction of entities and the `AgentStore`.
//!
//! # Usage
//!
//! ```rust
//! use mo_agent::{AgentSpec, AgentStoreBuilder, CombatProfile};
//! use mo_core::{FactionId, Vec3};
//!
//! let store = AgentStoreBuilder::new()
//!     .with(AgentSpec::unit(Vec3::ground(0.0, 0.0), 0.5).combat(CombatProfile::ranged(6.0)))
//!     .with(AgentSpec::structure(Vec3::ground(20.0, 0.0), 3.0).faction(FactionId(1)))
//!     .build();
//!
//! assert_eq!(store.count, 2);
//! ```

use mo_core::{FactionId, Vec3};

use crate::{AgentStore, CombatProfile, EntityKind, LocomotionProfile};

/// Initial state of one entity.
#[derive(Clone, Debug)]
pub struct AgentSpec {
    pub position:   Vec3,
    pub heading:    f32,
    pub radius:     f32,
    pub kind:       EntityKind,
    pub faction:    FactionId,
    pub locomotion: LocomotionProfile,
    pub combat:     CombatProfile,
}

impl AgentSpec {
    /// A mobile infantry unit of faction 0 that cannot attack.
    pub fn unit(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            heading:    0.0,
            radius,
            kind:       EntityKind::Unit,
            faction:    FactionId(0),
            locomotion: LocomotionProfile::infantry(),
            combat:     CombatProfile::default(),
        }
    }

    /// A static building of faction 0.
    pub fn structure(position: Vec3, radius: f32) -> Self {
        Self {
            kind:       EntityKind::Structure,
            locomotion: LocomotionProfile::stationary(),
            ..Self::unit(position, radius)
        }
    }

    /// A static portal teleporting entrants to `exit`.
    pub fn portal(position: Vec3, radius: f32, exit: Vec3) -> Self {
        Self { kind: EntityKind::Portal { exit }, ..Self::structure(position, radius) }
    }

    /// A mobile carrier boarding up to `capacity` units.
    pub fn carrier(position: Vec3, radius: f32, capacity: u32) -> Self {
        Self {
            kind:       EntityKind::Carrier { capacity },
            locomotion: LocomotionProfile::vehicle(),
            ..Self::unit(position, radius)
        }
    }

    pub fn faction(mut self, faction: FactionId) -> Self {
        self.faction = faction;
        self
    }

    pub fn heading(mut self, yaw: f32) -> Self {
        self.heading = yaw;
        self
    }

    pub fn locomotion(mut self, profile: LocomotionProfile) -> Self {
        self.locomotion = profile;
        self
    }

    pub fn combat(mut self, profile: CombatProfile) -> Self {
        self.combat = profile;
        self
    }
}

/// Fluent builder for [`AgentStore`].
#[derive(Default)]
pub struct AgentStoreBuilder {
    specs: Vec<AgentSpec>,
}

impl AgentStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entity.  Ids are assigned in insertion order from 0.
    pub fn with(mut self, spec: AgentSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Append every spec from an iterator.
    pub fn with_all<I: IntoIterator<Item = AgentSpec>>(mut self, specs: I) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Construct the `AgentStore`.  All arrays are allocated once.
    pub fn build(self) -> AgentStore {
        let mut store = AgentStore::with_capacity(self.specs.len());
        for spec in self.specs {
            store.push(spec);
        }
        store
    }
}
