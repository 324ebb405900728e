use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::Env;

/// Memory element: integrates `input` over time, trapezoidal from the
/// second committed step onward, forward Euler for the first.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub core: BlockCore,
    /// The constructor's `x0`, kept separate from the evolving `core.output`
    /// so `sigflow-fmt` can serialize the original `BLOCK` line exactly; the
    /// current output is instead captured as a `STATE` override.
    pub initial: f64,
    prev_input: Option<f64>,
    temp_output: f64,
    pending_input: f64,
}

impl Integrator {
    pub fn new(label: impl Into<String>, initial: f64) -> Self {
        Integrator {
            core: BlockCore::with_output(label, initial),
            initial,
            prev_input: None,
            temp_output: initial,
            pending_input: 0.0,
        }
    }

    pub(crate) fn compute(&mut self, dt: f64, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        self.temp_output = match self.prev_input {
            None => self.core.output + input * dt,
            Some(prev) => self.core.output + (input + prev) * dt / 2.0,
        };
        self.pending_input = input;
        Ok(())
    }

    pub(crate) fn commit(&mut self) -> Result<()> {
        self.core.output = self.temp_output;
        self.prev_input = Some(self.pending_input);
        Ok(())
    }
}
