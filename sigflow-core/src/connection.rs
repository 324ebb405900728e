//! Directed edges between blocks, addressed by arena index.

/// A wired edge: `source`'s output feeds `target`'s `target_input` slot.
///
/// Indices are positions into the simulation's flat block arena, the same
/// arena a [`crate::block::Subsystem`]'s own interior blocks live in. The
/// field order here matches the text format's serialization order
/// (`source`, `target`, `target_input`) — distinct from the *installation*
/// direction `target.inputs[target_input] = source` used internally, an
/// inconsistency the source material itself is not consistent about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: usize,
    pub target: usize,
    pub target_input: String,
}

impl Connection {
    pub fn new(source: usize, target: usize, target_input: impl Into<String>) -> Self {
        Connection { source, target, target_input: target_input.into() }
    }
}
