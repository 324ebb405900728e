use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::Env;

/// Emits `k * input`.
#[derive(Debug, Clone)]
pub struct Amplifier {
    pub core: BlockCore,
    pub gain: f64,
}

impl Amplifier {
    pub fn new(label: impl Into<String>, gain: f64) -> Self {
        Amplifier { core: BlockCore::new(label), gain }
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        self.core.output = self.gain * input;
        Ok(())
    }
}
