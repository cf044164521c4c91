//! `skirmish` — two small armies on a hilly, cluttered 96×96 field.
//!
//! A scripted command stream exercises every request the orchestrator
//! offers: group moves in both formation kinds, attack approaches, carrier
//! boarding and unloading, a portal hop, and casualties.  Traces land in
//! the output directory together with the script as `commands.json`.
//!
//! Run with:
//!   RUST_LOG=info cargo run -p skirmish --release -- [config.json] [output_dir]

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use mo_agent::{AgentSpec, AgentStore, AgentStoreBuilder, CombatProfile, LocomotionProfile};
use mo_core::{
    AgentId, AttackMode, FactionId, FormationKind, MovementConfig, SimRng, TargetMode, Tick, Vec3,
};
use mo_nav::{GridTerrain, GridTerrainBuilder};
use mo_output::{CsvWriter, TraceObserver};
use mo_sim::{Command, EventLog, MovementEvent, OrchestratorBuilder, RequestOutcome};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:             u64 = 7;
const FIELD_CELLS:      u32 = 96;
const OBSTACLE_DENSITY: f64 = 0.03;

const BLUE: FactionId = FactionId(0);
const RED:  FactionId = FactionId(1);

// ── World ─────────────────────────────────────────────────────────────────────

/// Ids of the entities the script refers to.
struct Roster {
    infantry: Vec<AgentId>,
    archers:  Vec<AgentId>,
    tanks:    Vec<AgentId>,
    carrier:  AgentId,
    portal:   AgentId,
    raiders:  Vec<AgentId>,
    tower:    AgentId,
}

fn build_terrain(rng: &mut SimRng) -> Result<GridTerrain> {
    let half = FIELD_CELLS as f32 / 2.0;
    let keep_clear = [
        (Vec3::ground(-32.0, 0.0), 12.0),
        (Vec3::ground(30.0, 0.0), 10.0),
        (Vec3::ground(0.0, 0.0), 8.0),
        (Vec3::ground(-30.0, 30.0), 5.0),
        (Vec3::ground(30.0, -30.0), 5.0),
    ];
    let terrain = GridTerrainBuilder::new(FIELD_CELLS, FIELD_CELLS, 1.0)
        .origin(-half, -half)
        .height_fn(|x, z| 0.8 * (x * 0.08).sin() + 0.5 * (z * 0.11).cos())
        // A ridge with a pass in the middle.
        .block_rect(Vec3::ground(12.0, -40.0), Vec3::ground(14.0, -6.0))
        .block_rect(Vec3::ground(12.0, 6.0), Vec3::ground(14.0, 40.0))
        .scatter_obstacles(rng, OBSTACLE_DENSITY, &keep_clear)
        .build()?;
    Ok(terrain)
}

/// Collects specs and hands out the id each will get.
#[derive(Default)]
struct Muster {
    specs: Vec<AgentSpec>,
}

impl Muster {
    fn add(&mut self, spec: AgentSpec) -> AgentId {
        self.specs.push(spec);
        AgentId(self.specs.len() as u32 - 1)
    }
}

fn build_agents() -> (AgentStore, Roster) {
    let mut m = Muster::default();

    let infantry = (0..12)
        .map(|i| {
            let at = Vec3::ground(-38.0 + (i % 4) as f32 * 2.0, -6.0 + (i / 4) as f32 * 2.5);
            m.add(AgentSpec::unit(at, 0.5).faction(BLUE).combat(CombatProfile::melee()))
        })
        .collect();
    let archers = (0..6)
        .map(|i| {
            let at = Vec3::ground(-38.0 + i as f32 * 1.5, 6.0);
            m.add(AgentSpec::unit(at, 0.5).faction(BLUE).combat(CombatProfile::ranged(6.0)))
        })
        .collect();
    let tanks = (0..3)
        .map(|i| {
            m.add(
                AgentSpec::unit(Vec3::ground(-30.0, -4.0 + i as f32 * 4.0), 1.2)
                    .faction(BLUE)
                    .locomotion(LocomotionProfile::vehicle())
                    .combat(CombatProfile::ranged(9.0)),
            )
        })
        .collect();
    let carrier = m.add(AgentSpec::carrier(Vec3::ground(-26.0, 10.0), 1.5, 4).faction(BLUE));
    let portal = m.add(AgentSpec::portal(
        Vec3::ground(-30.0, 30.0),
        1.0,
        Vec3::ground(30.0, -30.0),
    ));

    let raiders = (0..8)
        .map(|i| {
            m.add(
                AgentSpec::unit(Vec3::ground(34.0, -7.0 + i as f32 * 2.0), 0.5)
                    .faction(RED)
                    .heading(-std::f32::consts::FRAC_PI_2)
                    .combat(CombatProfile::melee()),
            )
        })
        .collect();
    let tower = m.add(
        AgentSpec::structure(Vec3::ground(30.0, 12.0), 2.0)
            .faction(RED)
            .combat(CombatProfile::ranged(10.0)),
    );

    let store = AgentStoreBuilder::new().with_all(m.specs).build();
    (store, Roster { infantry, archers, tanks, carrier, portal, raiders, tower })
}

/// `(tick, command)` pairs in issue order.
fn script(r: &Roster) -> Vec<(u64, Command)> {
    vec![
        (0, Command::GroupMove {
            agents:        r.infantry.clone(),
            destination:   Vec3::ground(0.0, 0.0),
            offset_radius: 0.0,
            reference:     None,
            mode:          TargetMode::Move,
            formation:     Some(FormationKind::Rectangular),
        }),
        (0, Command::AttackApproach {
            agents:      r.tanks.clone(),
            target:      r.tower,
            attack_mode: AttackMode::Unrestricted,
        }),
        (5, Command::GroupMove {
            agents:        r.archers[..4].to_vec(),
            destination:   Vec3::ZERO,
            offset_radius: 0.0,
            reference:     Some(r.carrier),
            mode:          TargetMode::EnterCarrier,
            formation:     None,
        }),
        (10, Command::Move {
            agent:         r.archers[4],
            destination:   Vec3::ZERO,
            offset_radius: 0.0,
            reference:     Some(r.portal),
            mode:          TargetMode::EnterPortal,
        }),
        (20, Command::AttackApproach {
            agents:      r.raiders.clone(),
            target:      r.infantry[0],
            attack_mode: AttackMode::KeepAssigned,
        }),
        (200, Command::Move {
            agent:         r.carrier,
            destination:   Vec3::ground(-6.0, 14.0),
            offset_radius: 0.0,
            reference:     None,
            mode:          TargetMode::Move,
        }),
        (320, Command::Kill(r.raiders[0])),
        (320, Command::Kill(r.raiders[1])),
        (400, Command::Unload(r.carrier)),
        (420, Command::AttackApproach {
            agents:      [r.infantry.clone(), r.archers.clone()].concat(),
            target:      r.raiders[2],
            attack_mode: AttackMode::AllowChange,
        }),
        (600, Command::Stop(r.archers[5])),
    ]
}

fn load_config(path: Option<&str>) -> Result<MovementConfig> {
    let Some(path) = path else {
        return Ok(MovementConfig { total_ticks: 1_200, ..MovementConfig::default() });
    };
    let file = File::open(path).with_context(|| format!("opening config {path}"))?;
    let config: MovementConfig =
        serde_json::from_reader(file).with_context(|| format!("parsing config {path}"))?;
    Ok(config)
}

fn report(tick: u64, command: &Command, outcome: &RequestOutcome) {
    info!(
        "t={tick} {}: {} assigned, {} engaged, {} unplaced, {} rejected",
        command.as_str(),
        outcome.assigned.len(),
        outcome.engaged.len(),
        outcome.unplaced.len(),
        outcome.rejected.len(),
    );
    for (agent, why) in &outcome.rejected {
        info!("    {agent} rejected: {why}");
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = load_config(args.get(1).map(String::as_str))?;
    let out_dir = PathBuf::from(args.get(2).map_or("skirmish_output", String::as_str));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    println!("=== skirmish — movement orchestration demo ===");
    println!("{}", serde_json::to_string_pretty(&config)?);

    let mut rng = SimRng::new(SEED);
    let terrain = build_terrain(&mut rng)?;
    let (agents, roster) = build_agents();
    let agent_count = agents.len();

    let commands = script(&roster);
    let script_file = File::create(out_dir.join("commands.json"))?;
    serde_json::to_writer_pretty(script_file, &commands)?;

    let writer = CsvWriter::new(&out_dir)?;
    let observer = (TraceObserver::new(writer, &config), EventLog::default());
    let mut orch = OrchestratorBuilder::new(terrain, agents)
        .config(config)
        .observer(observer)
        .build()?;

    let t0 = Instant::now();
    for (at, command) in commands {
        while orch.now() < Tick(at) {
            orch.tick()?;
        }
        let label = command.clone();
        match orch.issue(command) {
            Ok(outcome) => report(at, &label, &outcome),
            Err(e) => log::warn!("t={at} {}: refused: {e}", label.as_str()),
        }
    }
    orch.run()?;
    let elapsed = t0.elapsed();

    let final_tick = orch.now();
    let (mut trace, log) = orch.into_observer();
    if let Some(e) = trace.take_error() {
        eprintln!("output error: {e}");
    }

    println!();
    println!("Agents: {agent_count}  |  Ticks: {}  |  Wall time: {:.2?}", final_tick.0, elapsed);
    let kinds = [
        "path_attempt", "path_invalid", "arrived", "stuck", "engage", "entered", "stopped",
        "jobs_cancelled",
    ];
    for kind in kinds {
        let n = log.count(|e: &MovementEvent| e.kind() == kind);
        println!("  {kind:<16} {n:>6}");
    }
    println!("Traces written to {}", out_dir.display());
    Ok(())
}
