//! Emitting the text simulation format (spec §6): the inverse of `parser`.
//!
//! A `Subsystem` block's interior is written to its own `<label>.sim`
//! alongside the file being saved, referenced by a `BLOCK ... Subsystem
//! <filename>` line — mirroring how `parser::parse_into` reads one back in.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sigflow_core::block::Block;
use sigflow_core::connection::Connection;
use sigflow_core::Simulation;

use crate::error::Result;

/// Write `sim` to `path` (spec §6 `save`). `horizon` is the `TIME` line's
/// second field — the engine itself tracks only `dt`, so the caller
/// supplies the run length it wants the saved file to declare.
pub fn save(sim: &Simulation, path: impl AsRef<Path>, horizon: f64) -> Result<()> {
    let path = path.as_ref();
    let blocks = sim.blocks();
    let nested = nested_indices(blocks);
    let top_level: Vec<usize> = (0..blocks.len()).filter(|i| !nested.contains(i)).collect();
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    let mut out = String::new();
    write_scope(blocks, &top_level, sim.connections(), &base_dir, &mut out)?;
    writeln!(out, "TIME {} {}", format_f64(sim.dt()), format_f64(horizon)).unwrap();
    std::fs::write(path, out)?;
    Ok(())
}

/// Indices owned by some `Subsystem`'s `inner_order`, at any depth — same
/// rule `sigflow_core::Simulation` uses to keep them out of the top level.
fn nested_indices(blocks: &[Block]) -> HashSet<usize> {
    let mut nested = HashSet::new();
    for block in blocks {
        if let Block::Subsystem(sub) = block {
            nested.extend(sub.inner_order.iter().copied());
        }
    }
    nested
}

fn write_scope(blocks: &[Block], scope: &[usize], connections: &[Connection], base_dir: &Path, out: &mut String) -> Result<()> {
    for &idx in scope {
        let block = &blocks[idx];
        let id = block.label();
        if let Block::Subsystem(sub) = block {
            let filename = format!("{id}.sim");
            let mut sub_out = String::new();
            write_scope(blocks, &sub.inner_order, &sub.internal_connections, base_dir, &mut sub_out)?;
            std::fs::write(base_dir.join(&filename), sub_out)?;
            writeln!(out, "BLOCK {id} Subsystem {filename}").unwrap();
        } else {
            writeln!(out, "BLOCK {id} {}", block_args(block)).unwrap();
        }
    }

    for conn in connections {
        writeln!(out, "CONNECTION {} {} {}", blocks[conn.source].label(), blocks[conn.target].label(), conn.target_input).unwrap();
    }

    for &idx in scope {
        let block = &blocks[idx];
        if !block.is_subsystem() {
            writeln!(out, "STATE {} {}", block.label(), format_f64(block.output())).unwrap();
        }
    }

    Ok(())
}

fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

fn format_f64(v: f64) -> String {
    format!("{v}")
}

/// `<Type> [<arg> ...]`, in the same positional order `parser::build_block`
/// expects back.
fn block_args(block: &Block) -> String {
    let type_name = block.type_name();
    let args = match block {
        Block::Constant(b) => format_f64(b.value),
        Block::Generator(b) => quote(&b.source),
        Block::Amplifier(b) => format_f64(b.gain),
        Block::Inverter(_) | Block::Adder(_) | Block::Multiplier(_) | Block::Differentiator(_) | Block::Switch(_) => {
            String::new()
        }
        Block::Comparator(b) => format_f64(b.threshold),
        Block::Function(b) => quote(&b.source),
        Block::Integrator(b) => format_f64(b.initial),
        Block::Ode(b) => format!("{} {} {}", format_f64(b.initial), quote(&b.f_source), quote(&b.g_source)),
        Block::Scope(b) => b.label.clone(),
        Block::Subsystem(_) => unreachable!("subsystems are written by write_scope directly"),
    };
    if args.is_empty() {
        type_name.to_string()
    } else {
        format!("{type_name} {args}")
    }
}
