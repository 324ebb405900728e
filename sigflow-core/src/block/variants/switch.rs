use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::Env;

/// Emits `input` when `control > 0`, else `0`.
#[derive(Debug, Clone)]
pub struct Switch {
    pub core: BlockCore,
}

impl Switch {
    pub fn new(label: impl Into<String>) -> Self {
        Switch { core: BlockCore::new(label) }
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        let control = Block::require(env, &self.core.label, "control")?;
        self.core.output = if control > 0.0 { input } else { 0.0 };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_only_when_gated() {
        let mut sw = Switch::new("sw");
        sw.compute(&Env::new().with("input", 5.0).with("control", 1.0)).unwrap();
        assert_eq!(sw.core.output, 5.0);
        sw.compute(&Env::new().with("input", 5.0).with("control", -1.0)).unwrap();
        assert_eq!(sw.core.output, 0.0);
    }
}
