use crate::block::BlockCore;
use crate::connection::Connection;

/// Composite block whose interior is itself a block graph living in the
/// same flat arena as every top-level block. The first inner block (by
/// [`Subsystem::input_port`]) is the input port; the last
/// ([`Subsystem::output_port`]) is the output port.
///
/// `compute`/`commit` are not inherent methods here: the outer stepper
/// (`crate::stepper::compute_block`/`commit_block`) recognizes `Subsystem`
/// before generic dispatch and recurses into `inner_order` directly, since
/// driving the interior needs access to the whole arena, not just `self`.
#[derive(Debug, Clone)]
pub struct Subsystem {
    pub core: BlockCore,
    /// Arena indices of this subsystem's own blocks, in per-level
    /// topological order — used only to drive `compute`/`commit` each tick.
    pub inner_order: Vec<usize>,
    /// First/last inner block by *declaration* order (spec §4.8, matching
    /// `original_source/blocks.py::Subsystem` where `self.blocks` is never
    /// sorted: `blocks[0]`/`blocks[-1]` pick the ports). Deliberately not
    /// derived from `inner_order` — a subsystem whose blocks are declared
    /// out of dependency order would otherwise have the topological sort
    /// silently swap which block is wired as input vs. output.
    pub input_port: usize,
    pub output_port: usize,
    /// The subsystem's own connection list, replayed on every external
    /// `connect` call in addition to forwarding to `input_port`.
    pub internal_connections: Vec<Connection>,
}

impl Subsystem {
    /// `declaration_order` is the order blocks were declared in (source of
    /// the port convention); `inner_order` is the per-level topological
    /// order used to drive `compute`/`commit` each tick. The two commonly
    /// differ, and for a subsystem declared out of dependency order they
    /// must: using `inner_order` for port selection would pick the wrong
    /// blocks as input/output port.
    pub fn new(
        label: impl Into<String>,
        declaration_order: &[usize],
        inner_order: Vec<usize>,
        internal_connections: Vec<Connection>,
    ) -> Self {
        let input_port = *declaration_order.first().expect("subsystem must contain at least one block");
        let output_port = *declaration_order.last().expect("subsystem must contain at least one block");
        Subsystem { core: BlockCore::new(label), inner_order, input_port, output_port, internal_connections }
    }
}
