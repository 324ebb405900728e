use crate::block::BlockCore;
use crate::error::{Result, SimError};
use crate::expr::Env;

/// Emits the product of every wired input, whatever its name (at least one).
#[derive(Debug, Clone)]
pub struct Multiplier {
    pub core: BlockCore,
}

impl Multiplier {
    pub fn new(label: impl Into<String>) -> Self {
        Multiplier { core: BlockCore::new(label) }
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        if env.is_empty() {
            return Err(SimError::BlockHasNoInputs(self.core.label.clone()));
        }
        self.core.output = env.values().product();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_every_input() {
        let mut mul = Multiplier::new("mul");
        let env = Env::new().with("a", 2.0).with("b", 3.0).with("c", -1.0);
        mul.compute(&env).unwrap();
        assert_eq!(mul.core.output, -6.0);
    }
}
