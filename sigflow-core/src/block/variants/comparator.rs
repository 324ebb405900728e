use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::Env;

/// Emits `1` if `input >= threshold`, else `0`.
#[derive(Debug, Clone)]
pub struct Comparator {
    pub core: BlockCore,
    pub threshold: f64,
}

impl Comparator {
    pub fn new(label: impl Into<String>, threshold: f64) -> Self {
        Comparator { core: BlockCore::new(label), threshold }
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        self.core.output = if input >= self.threshold { 1.0 } else { 0.0 };
        Ok(())
    }
}
