//! The text simulation format (spec §6): load a `.sim` file into a
//! `sigflow_core::Simulation`, or save one back out.

pub mod error;
pub mod parser;
pub mod writer;

pub use error::{FormatError, Result};
pub use parser::{load_simulation_from_file, load_simulation_with_config, LoadedSimulation};
pub use writer::save;
