//! The simulation driver (spec §4.6): construction, time advancement,
//! state capture/restore, trace recording.

use std::collections::{HashMap, HashSet};

use crate::block::Block;
use crate::connection::Connection;
use crate::error::Result;
use crate::parameter::{solve_equations, Equation, ParameterTable};
use crate::stepper::{self, TickReport};
use crate::topo::topo_sort;

/// Tick size and fixed-point settlement parameters (spec §4.3 defaults).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig { max_iterations: 20, tolerance: 1e-6 }
    }
}

/// Recorded `(time, per-block samples)` from a [`Simulation::run`] call.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub time: Vec<f64>,
    /// `samples[block_index][tick]`.
    pub samples: Vec<Vec<f64>>,
}

/// Indices owned by some `Subsystem`'s `inner_order`, at any nesting depth —
/// these drive only through their owning subsystem's recursion and must not
/// also appear as independent top-level nodes.
fn nested_indices(blocks: &[Block]) -> HashSet<usize> {
    let mut nested = HashSet::new();
    for block in blocks {
        if let Block::Subsystem(sub) = block {
            nested.extend(sub.inner_order.iter().copied());
        }
    }
    nested
}

fn top_level_indices(blocks: &[Block]) -> Vec<usize> {
    let nested = nested_indices(blocks);
    (0..blocks.len()).filter(|i| !nested.contains(i)).collect()
}

/// The block graph, connections, and clock that make up a running
/// simulation. All blocks — top-level and every [`crate::block::Subsystem`]
/// interior — live in the single flat `blocks` arena (design notes §9).
pub struct Simulation {
    blocks: Vec<Block>,
    connections: Vec<Connection>,
    top_level: Vec<usize>,
    order: Vec<usize>,
    dt: f64,
    time: f64,
    config: SimulationConfig,
    initial_snapshot: Vec<f64>,
    parameters: ParameterTable,
}

impl Simulation {
    /// Wire `connections`, solve `equations` into `parameters`, sort, and
    /// snapshot the initial state (spec §4.6 `construct`).
    ///
    /// Block constructor arguments are expected to already carry resolved
    /// `f64` values — parameter substitution into block arguments is a
    /// parsing-time concern (`sigflow-fmt`), not an engine one; `parameters`
    /// and `equations` here exist so a programmatic caller gets the same
    /// `Equation` pre-solve spec §4.7 describes, without the engine needing
    /// to understand a block's constructor shape.
    pub fn construct(
        blocks: Vec<Block>,
        connections: Vec<Connection>,
        dt: f64,
        time: f64,
        mut parameters: ParameterTable,
        equations: Vec<Equation>,
    ) -> Result<Simulation> {
        solve_equations(&mut parameters, &equations)?;

        let top_level = top_level_indices(&blocks);
        let mut sim = Simulation {
            blocks,
            connections: Vec::new(),
            top_level,
            order: Vec::new(),
            dt,
            time,
            config: SimulationConfig::default(),
            initial_snapshot: Vec::new(),
            parameters,
        };

        for conn in &connections {
            stepper::connect_into(&mut sim.blocks, conn.target, &conn.target_input, conn.source);
        }
        sim.connections = connections;

        sim.resort();
        sim.initial_snapshot = sim.blocks.iter().map(Block::output).collect();

        tracing::info!(blocks = sim.blocks.len(), dt, "simulation constructed");
        Ok(sim)
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SimulationConfig) {
        self.config = config;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.parameters
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn resort(&mut self) {
        self.order = topo_sort(&self.blocks, &self.top_level);
    }

    /// Append a top-level block and re-sort (spec §4.6 `add_block`).
    pub fn add_block(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        let idx = self.blocks.len() - 1;
        self.top_level.push(idx);
        self.resort();
        idx
    }

    /// Install a connection and re-sort (spec §4.6 `add_connection`).
    pub fn add_connection(&mut self, connection: Connection) {
        stepper::connect_into(&mut self.blocks, connection.target, &connection.target_input, connection.source);
        self.connections.push(connection);
        self.resort();
    }

    /// One tick: advance `time` by `dt` and settle the graph (spec §4.3).
    pub fn update(&mut self) -> Result<TickReport> {
        stepper::tick(&mut self.blocks, &self.order, &mut self.time, self.dt, self.config.max_iterations, self.config.tolerance)
    }

    /// Invoke [`Simulation::update`] until `time` has advanced by at least
    /// `duration`, recording `(time, state_vector)` after every commit.
    pub fn run(&mut self, duration: f64) -> Result<Trace> {
        let start = self.time;
        let mut trace = Trace { time: Vec::new(), samples: vec![Vec::new(); self.blocks.len()] };

        while self.time - start < duration {
            self.update()?;
            trace.time.push(self.time);
            for (slot, block) in trace.samples.iter_mut().zip(self.blocks.iter()) {
                slot.push(block.output());
            }
        }

        Ok(trace)
    }

    /// Restore `time <- 0` and outputs from the snapshot taken at
    /// construction (spec §4.6 `reset`).
    pub fn reset(&mut self) {
        self.time = 0.0;
        for (block, &initial) in self.blocks.iter_mut().zip(self.initial_snapshot.iter()) {
            block.core_mut().output = initial;
        }
        tracing::info!("simulation reset");
    }

    /// Mapping block -> scalar, aligned with the current block list
    /// (spec §4.6 `get_state`).
    pub fn get_state(&self) -> Vec<f64> {
        self.blocks.iter().map(Block::output).collect()
    }

    /// Overwrite every block's output from a previously captured state
    /// vector (spec §4.6 `set_state`).
    pub fn set_state(&mut self, state: &[f64]) {
        for (block, &value) in self.blocks.iter_mut().zip(state.iter()) {
            block.core_mut().output = value;
        }
    }

    /// Mapping scope label -> output, for every `Scope` block
    /// (spec §4.6 `get_outputs`).
    pub fn get_outputs(&self) -> HashMap<String, f64> {
        let mut outputs = HashMap::new();
        for block in &self.blocks {
            if let Block::Scope(scope) = block {
                outputs.insert(scope.label.clone(), scope.core.output);
            }
        }
        outputs
    }
}

/// Fluent constructor mirroring the teacher's `GraphBuilder`: push blocks
/// and connections, then consume the builder into a wired [`Simulation`].
pub struct SimulationBuilder {
    blocks: Vec<Block>,
    connections: Vec<Connection>,
    dt: f64,
    time: f64,
    parameters: ParameterTable,
    equations: Vec<Equation>,
    config: SimulationConfig,
}

impl SimulationBuilder {
    pub fn new(dt: f64) -> Self {
        SimulationBuilder {
            blocks: Vec::new(),
            connections: Vec::new(),
            dt,
            time: 0.0,
            parameters: ParameterTable::new(),
            equations: Vec::new(),
            config: SimulationConfig::default(),
        }
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn with_parameters(mut self, parameters: ParameterTable) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_equations(mut self, equations: Vec<Equation>) -> Self {
        self.equations = equations;
        self
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a block to the arena, returning its index for use in
    /// `connect`.
    pub fn add(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// The arena as built so far — needed to compute a
    /// [`crate::block::Subsystem`]'s `inner_order` via
    /// [`crate::topo::topo_sort`] before wrapping it and adding it as a
    /// block of its own.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn connect(&mut self, source: usize, target: usize, target_input: impl Into<String>) {
        self.connections.push(Connection::new(source, target, target_input));
    }

    pub fn build(self) -> Result<Simulation> {
        let mut sim = Simulation::construct(self.blocks, self.connections, self.dt, self.time, self.parameters, self.equations)?;
        sim.set_config(self.config);
        // config affects only future `update()` calls, not the already-taken
        // initial snapshot, so applying it post-construct is equivalent.
        Ok(sim)
    }
}
