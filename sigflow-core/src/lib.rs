//! Discrete-time signal-flow block diagram simulation engine.
//!
//! A user-assembled directed graph of blocks (sources, arithmetic,
//! integrators, comparators, user expressions, nested subsystems) is
//! advanced in fixed time increments; each tick settles instantaneous
//! relations by fixed-point iteration before committing memory-element
//! state. See [`simulation::Simulation`] for the driver and [`block::Block`]
//! for the variant set.

pub mod block;
pub mod connection;
pub mod error;
pub mod expr;
pub mod parameter;
pub mod simulation;
pub mod stepper;
pub mod topo;

pub use block::{Block, BlockCore, BlockId};
pub use connection::Connection;
pub use error::{Result, SimError};
pub use parameter::{Equation, Parameter, ParameterTable};
pub use simulation::{Simulation, SimulationBuilder, SimulationConfig, Trace};
