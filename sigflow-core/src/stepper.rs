//! The fixed-point stepper (spec §4.3) and the two-phase memory discipline
//! (§4.4), expressed as free functions over `&mut [Block]` rather than
//! methods, so a [`crate::block::Subsystem`] can recurse into other
//! elements of the very arena it lives in without violating borrow rules.
//! Every recursive call re-indexes the slice fresh; no borrow of one
//! element is ever held open across a call into another.

use crate::block::{Block, BlockId};
use crate::error::Result;
use crate::expr::Env;

/// Install `source` as `target`'s `name` input. If `target` is a
/// [`crate::block::Subsystem`], this forwards to its `input_port` and
/// replays its own internal connection list (spec §4.8), and the
/// subsystem's own `core.inputs` is never written — it has no externally
/// visible input map, by design (see DESIGN.md).
pub fn connect_into(blocks: &mut [Block], target: usize, name: &str, source: usize) {
    let subsystem_replay = match &blocks[target] {
        Block::Subsystem(sb) => Some((sb.input_port, sb.internal_connections.clone())),
        _ => None,
    };

    match subsystem_replay {
        Some((input_port, internal_connections)) => {
            connect_into(blocks, input_port, name, source);
            for conn in &internal_connections {
                connect_into(blocks, conn.target, &conn.target_input, conn.source);
            }
        }
        None => {
            blocks[target].core_mut().inputs.insert(name.to_string(), BlockId(source));
        }
    }
}

/// Gather the named input values a block currently reads, from the output
/// values already settled elsewhere in the arena.
fn gather_inputs(blocks: &[Block], idx: usize) -> Env {
    let mut env = Env::new();
    for (name, src) in &blocks[idx].core().inputs {
        env.set(name, blocks[src.0].core().output);
    }
    env
}

/// Evaluate block `idx` for this iteration. A [`crate::block::Subsystem`]
/// recurses into its own `inner_order`; everything else gathers its wired
/// inputs and delegates to [`Block::compute`].
pub fn compute_block(blocks: &mut [Block], idx: usize, t: f64, dt: f64) -> Result<()> {
    if let Block::Subsystem(sb) = &blocks[idx] {
        let inner_order = sb.inner_order.clone();
        for inner_idx in inner_order {
            compute_block(blocks, inner_idx, t, dt)?;
        }
        return Ok(());
    }

    let env = gather_inputs(blocks, idx);
    blocks[idx].compute(t, dt, &env)
}

/// Publish block `idx`'s value for this tick. A [`crate::block::Subsystem`]
/// commits every inner block in order, then copies its output port's value
/// up to its own `core.output` (spec §4.8).
pub fn commit_block(blocks: &mut [Block], idx: usize) -> Result<()> {
    if let Block::Subsystem(sb) = &blocks[idx] {
        let inner_order = sb.inner_order.clone();
        let output_port = sb.output_port;
        for inner_idx in &inner_order {
            commit_block(blocks, *inner_idx)?;
        }
        let out = blocks[output_port].core().output;
        blocks[idx].core_mut().output = out;
        return Ok(());
    }

    blocks[idx].commit()
}

/// Outcome of one [`tick`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub converged: bool,
    pub iterations: usize,
}

/// Advance `time` by `dt` and settle the graph (spec §4.3): repeatedly
/// evaluate every block in `order` until the relative residual drops below
/// `tolerance` or `max_iterations` is exhausted, then commit every block
/// exactly once.
pub fn tick(
    blocks: &mut [Block],
    order: &[usize],
    time: &mut f64,
    dt: f64,
    max_iterations: usize,
    tolerance: f64,
) -> Result<TickReport> {
    *time += dt;
    let t = *time;

    let mut converged = false;
    let mut iterations = 0;

    for iter in 1..=max_iterations {
        iterations = iter;
        let prev: Vec<f64> = order.iter().map(|&idx| blocks[idx].core().output).collect();

        for &idx in order {
            compute_block(blocks, idx, t, dt)?;
        }

        let mut max_rel = 0.0_f64;
        let mut any_nonzero = false;
        for (k, &idx) in order.iter().enumerate() {
            let current = blocks[idx].core().output;
            if current != 0.0 {
                any_nonzero = true;
                let rel = ((current - prev[k]) / current).abs();
                max_rel = max_rel.max(rel);
            }
        }
        let rho = if any_nonzero { max_rel } else { 0.0 };

        if rho < tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::warn!(time = t, max_iterations, "fixed-point iteration did not converge");
    }
    tracing::debug!(time = t, iterations, converged, "tick settled");

    for &idx in order {
        commit_block(blocks, idx)?;
    }

    Ok(TickReport { converged, iterations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::variants::{adder::Adder, amplifier::Amplifier, constant::Constant};

    #[test]
    fn algebraic_loop_converges() {
        // Constant 1 -> Adder(a), Adder -> Amplifier 0.5 -> Adder(b)
        let mut blocks =
            vec![Block::Constant(Constant::new("c", 1.0)), Block::Adder(Adder::new("add")), Block::Amplifier(Amplifier::new("amp", 0.5))];
        connect_into(&mut blocks, 1, "a", 0);
        connect_into(&mut blocks, 1, "b", 2);
        connect_into(&mut blocks, 2, "input", 1);

        let order = crate::topo::topo_sort(&blocks, &[0, 1, 2]);
        let mut time = 0.0;
        let report = tick(&mut blocks, &order, &mut time, 0.1, 30, 1e-6).unwrap();
        assert!(report.converged);
        assert!((blocks[1].core().output - 2.0).abs() < 1e-6);
        assert!((blocks[2].core().output - 1.0).abs() < 1e-6);
    }
}
