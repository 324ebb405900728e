use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::Env;

/// Emits `-input`.
#[derive(Debug, Clone)]
pub struct Inverter {
    pub core: BlockCore,
}

impl Inverter {
    pub fn new(label: impl Into<String>) -> Self {
        Inverter { core: BlockCore::new(label) }
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        self.core.output = -input;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negates_its_input() {
        let mut inv = Inverter::new("inv");
        inv.compute(&Env::new().with("input", 4.0)).unwrap();
        assert_eq!(inv.core.output, -4.0);
    }
}
