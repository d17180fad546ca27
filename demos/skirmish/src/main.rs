//! skirmish: a squad and a handful of villagers crossing a walled map.
//!
//! The map is split by a wall with a single gap.  A mixed squad receives a
//! group order to the far side while villagers wander to random fields; a
//! building goes up on the squad's route partway through, forcing replans.
//!
//! ```text
//! cargo run -p skirmish -- [config.toml] [trace-dir]
//! RUST_LOG=debug cargo run -p skirmish
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gn_core::{AgentId, ArrivalReaction, CellCoord, SimRng, Tick, UnitCategory, WorldPoint};
use gn_grid::{AStarPathfinder, GridBuilder};
use gn_mobility::MobilityStore;
use gn_output::{CsvTraceWriter, TraceObserver};
use gn_sim::{GroupId, NavConfig, NavSim, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const WIDTH:       i32 = 48;
const HEIGHT:      i32 = 32;
const CELL_SIZE:   f32 = 1.0;
/// Column of the dividing wall and the rows left open in it.
const WALL_X:      i32 = 24;
const GAP:         std::ops::Range<i32> = 14..18;
const FRAME_SECS:  f32 = 1.0 / 60.0;
const FRAMES:      u32 = 60 * 40;
const BUILD_FRAME: u32 = 60 * 5;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Counts what happened and forwards everything to the CSV trace.
struct Report {
    trace:    TraceObserver<CsvTraceWriter>,
    arrivals: usize,
    harvests: usize,
    stuck:    usize,
    groups:   Vec<(Tick, GroupId, usize)>,
}

impl SimObserver for Report {
    fn on_arrival(&mut self, tick: Tick, agent: AgentId, cell: CellCoord, reaction: ArrivalReaction) {
        self.arrivals += 1;
        if reaction == ArrivalReaction::BeginHarvest {
            self.harvests += 1;
            info!(%tick, %agent, %cell, "villager starts harvesting");
        }
        self.trace.on_arrival(tick, agent, cell, reaction);
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId, replans: u32) {
        self.stuck += 1;
        self.trace.on_stuck(tick, agent, replans);
    }

    fn on_abandoned(&mut self, tick: Tick, agent: AgentId, cell: Option<CellCoord>) {
        self.trace.on_abandoned(tick, agent, cell);
    }

    fn on_group_arrived(&mut self, tick: Tick, group: GroupId, members: &[AgentId]) {
        info!(%tick, %group, members = members.len(), "squad in position");
        self.groups.push((tick, group, members.len()));
        self.trace.on_group_arrived(tick, group, members);
    }

    fn on_snapshot(&mut self, tick: Tick, mobility: &MobilityStore) {
        self.trace.on_snapshot(tick, mobility);
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

fn is_open(p: WorldPoint) -> bool {
    let x = (p.x / CELL_SIZE).floor() as i32;
    let y = (p.y / CELL_SIZE).floor() as i32;
    let border = x == 0 || y == 0 || x == WIDTH - 1 || y == HEIGHT - 1;
    let wall = x == WALL_X && !GAP.contains(&y);
    !(border || wall)
}

fn load_config(path: Option<&String>) -> Result<NavConfig> {
    match path {
        Some(p) => NavConfig::load(p).with_context(|| format!("loading {p}")),
        None => Ok(NavConfig { seed: 42, snapshot_interval_ticks: 10, ..Default::default() }),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    let config = load_config(args.get(1))?;
    let trace_dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("output/skirmish"));
    info!(seed = config.seed, dt = config.tick_dt_secs, "config loaded");

    // 1. Map and simulation.
    let grid = GridBuilder::new(WIDTH, HEIGHT, CELL_SIZE).build_with(is_open)?;
    let pathfinder = AStarPathfinder::for_grid(&grid);
    let mut sim = SimBuilder::new(config.clone(), grid, pathfinder).build()?;
    let mut rng = SimRng::new(config.seed);

    // 2. Squad on the west side, villagers in the south-west.
    let squad_spec = [
        UnitCategory::Infantry,
        UnitCategory::Infantry,
        UnitCategory::Leader,
        UnitCategory::Cavalry,
        UnitCategory::Infantry,
        UnitCategory::Siege,
        UnitCategory::Cavalry,
        UnitCategory::Infantry,
    ];
    let mut squad = Vec::with_capacity(squad_spec.len());
    for category in squad_spec {
        squad.push(sim.spawn_near(category, CellCoord::new(5, 8))?);
    }
    let mut villagers = Vec::new();
    for _ in 0..4 {
        villagers.push(sim.spawn_near(UnitCategory::Villager, CellCoord::new(6, 25))?);
    }
    info!(squad = squad.len(), villagers = villagers.len(), "units spawned");

    // 3. Orders.
    let order = sim.issue_group_order(&squad, CellCoord::new(40, 10), true)?;
    for (agent, outcome) in &order.assignments {
        info!(%agent, ?outcome, "formation slot");
    }
    for &v in &villagers {
        let field = CellCoord::new(rng.gen_range(30..WIDTH - 2), rng.gen_range(20..HEIGHT - 2));
        let outcome = sim.request_destination(v, field, false)?;
        info!(agent = %v, %field, ?outcome, "villager sent to field");
    }

    // 4. Frame loop.
    let mut report = Report {
        trace:    TraceObserver::new(CsvTraceWriter::new(&trace_dir)?),
        arrivals: 0,
        harvests: 0,
        stuck:    0,
        groups:   Vec::new(),
    };
    let leader = order
        .accepted()
        .map(|(a, _)| a)
        .find(|&a| sim.registry.get(a).is_some_and(|r| r.category == UnitCategory::Leader));

    for frame in 0..FRAMES {
        sim.advance(FRAME_SECS, &mut report);

        if frame == BUILD_FRAME {
            let changed = sim.occupy_footprint(CellCoord::new(34, 11), (2, 6));
            info!(tick = %sim.current_tick(), changed, "barracks placed on the squad's route");
        }
        if frame % 300 == 0 {
            if let Some(pos) = leader.and_then(|l| sim.render_position(l, sim.alpha())) {
                info!(tick = %sim.current_tick(), leader = %pos, "frame {frame}");
            }
        }
    }

    report.trace.finish()?;
    if let Some(e) = report.trace.take_error() {
        eprintln!("trace error: {e}");
    }

    // 5. Summary.
    println!();
    println!("Ran {} ticks ({} frames)", sim.current_tick().0, FRAMES);
    println!(
        "arrivals: {}  harvests: {}  stuck: {}  groups done: {}",
        report.arrivals,
        report.harvests,
        report.stuck,
        report.groups.len()
    );
    println!("trace written to {}", trace_dir.display());
    println!();
    print_agents(&sim);
    Ok(())
}

fn print_agents(sim: &NavSim<AStarPathfinder>) {
    println!("{:<6} {:<10} {:<10} {:<18} {:<10}", "Agent", "Category", "Phase", "Position", "Reserved");
    println!("{}", "-".repeat(58));
    for record in sim.registry.iter() {
        let Some(state) = sim.movement.store.get(record.id) else { continue };
        let reserved = sim
            .reserved_cell(record.id)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<6} {:<10} {:<10} {:<18} {:<10}",
            record.id.to_string(),
            record.category.as_str(),
            state.phase.as_str(),
            state.sim_pos.to_string(),
            reserved,
        );
    }
}
