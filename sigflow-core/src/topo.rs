//! Iterative DFS topological sort (spec §4.2) — explicitly not Kahn's
//! algorithm. Ties are broken by `scope`'s caller-supplied order.
//!
//! Used both for the top-level block order and, independently, for each
//! [`crate::block::Subsystem`]'s interior (per-level cycle detection: a
//! subsystem's own sort never looks outside `scope`).

use std::collections::HashSet;

use crate::block::Block;

/// Sort `scope` (arena indices) so each block follows every block it reads
/// from, whenever that read-graph restricted to `scope` is acyclic. Cycles
/// still yield a total order; staleness on the closing back-edge is
/// absorbed by the fixed-point stepper, not rejected here.
pub fn topo_sort(blocks: &[Block], scope: &[usize]) -> Vec<usize> {
    let scope_set: HashSet<usize> = scope.iter().copied().collect();
    let mut visited: HashSet<usize> = HashSet::new();
    let mut order = Vec::with_capacity(scope.len());

    let mut unsorted: Vec<usize> = scope.to_vec();
    unsorted.reverse();

    while let Some(current) = unsorted.pop() {
        if !visited.contains(&current) {
            visit(current, blocks, &scope_set, &mut visited, &mut order);
        }
    }

    order
}

fn visit(
    idx: usize,
    blocks: &[Block],
    scope: &HashSet<usize>,
    visited: &mut HashSet<usize>,
    order: &mut Vec<usize>,
) {
    visited.insert(idx);
    let mut deps: Vec<usize> = blocks[idx].core().inputs.values().map(|id| id.0).collect();
    deps.retain(|d| scope.contains(d));
    for dep in deps {
        if !visited.contains(&dep) {
            visit(dep, blocks, scope, visited, order);
        }
    }
    order.push(idx);
}
