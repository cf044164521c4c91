//! Serializable movement commands.
//!
//! A `Command` is the data form of one request on the orchestrator.
//! Recording a command stream and replaying it through
//! [`Orchestrator::issue`] against the same starting world reproduces the
//! same run.

use mo_core::{AgentId, AttackMode, FormationKind, TargetMode, Vec3};
use mo_nav::TerrainNav;

use crate::{MovementObserver, Orchestrator, RequestOutcome, RequestResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Move {
        agent:         AgentId,
        destination:   Vec3,
        offset_radius: f32,
        reference:     Option<AgentId>,
        mode:          TargetMode,
    },
    GroupMove {
        agents:        Vec<AgentId>,
        destination:   Vec3,
        offset_radius: f32,
        reference:     Option<AgentId>,
        mode:          TargetMode,
        formation:     Option<FormationKind>,
    },
    AttackApproach {
        agents:      Vec<AgentId>,
        target:      AgentId,
        attack_mode: AttackMode,
    },
    Stop(AgentId),
    Kill(AgentId),
    Unload(AgentId),
}

impl Command {
    /// Plain move of one agent to `destination`.
    pub fn move_to(agent: AgentId, destination: Vec3) -> Self {
        Command::Move {
            agent,
            destination,
            offset_radius: 0.0,
            reference: None,
            mode: TargetMode::Move,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Move { .. }           => "move",
            Command::GroupMove { .. }      => "group_move",
            Command::AttackApproach { .. } => "attack_approach",
            Command::Stop(_)               => "stop",
            Command::Kill(_)               => "kill",
            Command::Unload(_)             => "unload",
        }
    }
}

impl<T: TerrainNav, O: MovementObserver> Orchestrator<T, O> {
    /// Dispatch `command` to the matching request method.
    ///
    /// `Stop` and `Kill` return an empty outcome.
    pub fn issue(&mut self, command: Command) -> RequestResult<RequestOutcome> {
        match command {
            Command::Move { agent, destination, offset_radius, reference, mode } => {
                self.request_move(agent, destination, offset_radius, reference, mode)
            }
            Command::GroupMove { agents, destination, offset_radius, reference, mode, formation } => {
                self.request_group_move(&agents, destination, offset_radius, reference, mode, formation)
            }
            Command::AttackApproach { agents, target, attack_mode } => {
                self.request_attack_approach(&agents, target, attack_mode)
            }
            Command::Stop(agent) => {
                self.stop(agent)?;
                Ok(RequestOutcome::default())
            }
            Command::Kill(agent) => {
                self.kill(agent)?;
                Ok(RequestOutcome::default())
            }
            Command::Unload(carrier) => self.unload(carrier),
        }
    }
}
