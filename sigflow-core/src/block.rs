//! The closed block variant set and its tagged-enum dispatch.
//!
//! Mirrors the teacher's `BlockType<S>` shape: one tagged enum, exhaustive
//! `match` per operation, no trait objects. Unlike the teacher there is no
//! `Sample` generic — every scalar here is `f64`.

use crate::error::{Result, SimError};
use crate::expr::Env;

pub mod variants;

pub use variants::{
    adder::Adder, amplifier::Amplifier, comparator::Comparator, constant::Constant,
    differentiator::Differentiator, function::Function, generator::Generator,
    integrator::Integrator, inverter::Inverter, multiplier::Multiplier, ode::Ode, scope::Scope,
    subsystem::Subsystem, switch::Switch,
};

/// Index of a block within a simulation's flat arena. Stable for the
/// lifetime of the simulation; a subsystem's interior blocks get indices in
/// the same arena as every top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

impl From<usize> for BlockId {
    fn from(i: usize) -> Self {
        BlockId(i)
    }
}

/// Insertion-ordered `name -> source block` map. A plain `HashMap` would
/// make sibling-input iteration order process-random, which leaks into
/// [`crate::topo::topo_sort`]'s dependency visit order for any block with
/// two or more unconstrained sibling inputs — the original's Python `dict`
/// is insertion-ordered and never has this problem (`original_source/
/// simulation.py::_sort_blocks`), so this mirrors that rather than
/// `HashMap`'s guarantees.
#[derive(Debug, Clone, Default)]
pub struct InputMap(Vec<(String, BlockId)>);

impl InputMap {
    pub fn new() -> Self {
        InputMap(Vec::new())
    }

    /// Reassigning an already-present name updates its value in place,
    /// keeping its original position — matching `dict.__setitem__` on an
    /// existing key.
    pub fn insert(&mut self, name: String, id: BlockId) {
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = id,
            None => self.0.push((name, id)),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &BlockId> {
        self.0.iter().map(|(_, id)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlockId)> {
        self.0.iter().map(|(name, id)| (name.as_str(), id))
    }
}

impl<'a> IntoIterator for &'a InputMap {
    type Item = (&'a str, &'a BlockId);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a BlockId)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Fields every block variant carries regardless of behavior.
#[derive(Debug, Clone, Default)]
pub struct BlockCore {
    pub label: String,
    /// input-name -> source block, populated by connection installation.
    pub inputs: InputMap,
    pub output: f64,
}

impl BlockCore {
    pub fn new(label: impl Into<String>) -> Self {
        BlockCore { label: label.into(), inputs: InputMap::new(), output: 0.0 }
    }

    pub fn with_output(label: impl Into<String>, output: f64) -> Self {
        BlockCore { label: label.into(), inputs: InputMap::new(), output }
    }
}

/// The closed set of block variants (spec §3).
#[derive(Debug, Clone)]
pub enum Block {
    Constant(Constant),
    Generator(Generator),
    Amplifier(Amplifier),
    Inverter(Inverter),
    Adder(Adder),
    Multiplier(Multiplier),
    Comparator(Comparator),
    Function(Function),
    Integrator(Integrator),
    Differentiator(Differentiator),
    Ode(Ode),
    Switch(Switch),
    Scope(Scope),
    Subsystem(Subsystem),
}

macro_rules! dispatch {
    ($self:expr, $pattern:pat => $body:expr) => {
        match $self {
            Block::Constant($pattern) => $body,
            Block::Generator($pattern) => $body,
            Block::Amplifier($pattern) => $body,
            Block::Inverter($pattern) => $body,
            Block::Adder($pattern) => $body,
            Block::Multiplier($pattern) => $body,
            Block::Comparator($pattern) => $body,
            Block::Function($pattern) => $body,
            Block::Integrator($pattern) => $body,
            Block::Differentiator($pattern) => $body,
            Block::Ode($pattern) => $body,
            Block::Switch($pattern) => $body,
            Block::Scope($pattern) => $body,
            Block::Subsystem($pattern) => $body,
        }
    };
}

impl Block {
    pub fn core(&self) -> &BlockCore {
        dispatch!(self, b => &b.core)
    }

    pub fn core_mut(&mut self) -> &mut BlockCore {
        dispatch!(self, b => &mut b.core)
    }

    pub fn label(&self) -> &str {
        &self.core().label
    }

    pub fn output(&self) -> f64 {
        self.core().output
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Block::Constant(_) => "Constant",
            Block::Generator(_) => "Generator",
            Block::Amplifier(_) => "Amplifier",
            Block::Inverter(_) => "Inverter",
            Block::Adder(_) => "Adder",
            Block::Multiplier(_) => "Multiplier",
            Block::Comparator(_) => "Comparator",
            Block::Function(_) => "Function",
            Block::Integrator(_) => "Integrator",
            Block::Differentiator(_) => "Differentiator",
            Block::Ode(_) => "ODE",
            Block::Switch(_) => "Switch",
            Block::Scope(_) => "Scope",
            Block::Subsystem(_) => "Subsystem",
        }
    }

    /// Memory blocks defer their output to `commit`; everyone else assigns
    /// `output` directly inside `compute`.
    pub fn is_memory(&self) -> bool {
        matches!(self, Block::Integrator(_) | Block::Differentiator(_) | Block::Ode(_))
    }

    /// True for the one variant whose `compute`/`commit` is driven by
    /// [`crate::stepper`] recursing into the arena rather than by the match
    /// arms below.
    pub fn is_subsystem(&self) -> bool {
        matches!(self, Block::Subsystem(_))
    }

    /// Look up a required, already-resolved input value by name.
    pub fn require(env: &Env, label: &str, name: &str) -> Result<f64> {
        env.get(name).ok_or_else(|| SimError::MissingRequiredInput(label.to_string(), name.to_string()))
    }

    /// Evaluate this tick's value. Combinational blocks write `core.output`
    /// directly; memory blocks write their scratch and leave `output`
    /// untouched until [`Block::commit`]. Subsystems are handled by
    /// [`crate::stepper::compute_block`] before this is ever reached.
    pub fn compute(&mut self, t: f64, dt: f64, env: &Env) -> Result<()> {
        match self {
            Block::Constant(b) => b.compute(),
            Block::Generator(b) => b.compute(t),
            Block::Amplifier(b) => b.compute(env),
            Block::Inverter(b) => b.compute(env),
            Block::Adder(b) => b.compute(env),
            Block::Multiplier(b) => b.compute(env),
            Block::Comparator(b) => b.compute(env),
            Block::Function(b) => b.compute(env),
            Block::Integrator(b) => b.compute(dt, env),
            Block::Differentiator(b) => b.compute(dt, env),
            Block::Ode(b) => b.compute(dt, env),
            Block::Switch(b) => b.compute(env),
            Block::Scope(b) => b.compute(env),
            Block::Subsystem(_) => Ok(()),
        }
    }

    /// Publish the latest scratch value (memory blocks) or do nothing
    /// (combinational blocks, per spec's "non-memory blocks expose a no-op
    /// commit"). Subsystems are handled by [`crate::stepper::commit_block`].
    pub fn commit(&mut self) -> Result<()> {
        match self {
            Block::Integrator(b) => b.commit(),
            Block::Differentiator(b) => b.commit(),
            Block::Ode(b) => b.commit(),
            _ => Ok(()),
        }
    }
}
