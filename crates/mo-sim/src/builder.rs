//! Fluent builder for constructing an [`Orchestrator`].

use mo_agent::AgentStore;
use mo_core::MovementConfig;
use mo_locomotion::LocomotionEngine;
use mo_nav::TerrainNav;
use mo_reserve::ReservationRegistry;
use mo_schedule::TaskQueue;

use crate::{MovementObserver, NoopObserver, Orchestrator, SimError, SimResult};

/// Fluent builder for [`Orchestrator<T, O>`].
///
/// # Required inputs
///
/// - `T: TerrainNav` — the terrain navigation service
/// - [`AgentStore`] — from [`mo_agent::AgentStoreBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                     |
/// |-----------------|-----------------------------|
/// | `.config(c)`    | `MovementConfig::default()` |
/// | `.observer(o)`  | [`NoopObserver`]            |
///
/// # Example
///
/// ```rust,ignore
/// let agents = AgentStoreBuilder::new().with_all(specs).build();
/// let mut orch = OrchestratorBuilder::new(terrain, agents)
///     .config(config)
///     .observer(EventLog::default())
///     .build()?;
/// orch.run()?;
/// ```
pub struct OrchestratorBuilder<T: TerrainNav, O: MovementObserver = NoopObserver> {
    terrain:  T,
    agents:   AgentStore,
    config:   MovementConfig,
    observer: O,
}

impl<T: TerrainNav> OrchestratorBuilder<T, NoopObserver> {
    pub fn new(terrain: T, agents: AgentStore) -> Self {
        Self {
            terrain,
            agents,
            config:   MovementConfig::default(),
            observer: NoopObserver,
        }
    }
}

impl<T: TerrainNav, O: MovementObserver> OrchestratorBuilder<T, O> {
    pub fn config(mut self, config: MovementConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the observer.
    pub fn observer<P: MovementObserver>(self, observer: P) -> OrchestratorBuilder<T, P> {
        OrchestratorBuilder {
            terrain: self.terrain,
            agents:  self.agents,
            config:  self.config,
            observer,
        }
    }

    /// Validate the config, pin a marker for every agent in the world, and
    /// return a ready-to-run [`Orchestrator`].
    pub fn build(self) -> SimResult<Orchestrator<T, O>> {
        self.config.validate().map_err(|e| SimError::Config(e.to_string()))?;

        let mut registry = ReservationRegistry::new();
        for agent in self.agents.agent_ids() {
            if self.agents.is_active(agent) {
                let i = agent.index();
                registry.pin(agent, self.agents.position[i], self.agents.radius[i]);
            }
        }

        Ok(Orchestrator {
            clock:      self.config.make_clock(),
            locomotion: LocomotionEngine::new(self.agents.count, &self.config),
            config:     self.config,
            agents:     self.agents,
            registry,
            queue:      TaskQueue::new(),
            terrain:    self.terrain,
            observer:   self.observer,
        })
    }
}
