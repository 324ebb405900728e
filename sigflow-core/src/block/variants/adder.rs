use crate::block::BlockCore;
use crate::error::{Result, SimError};
use crate::expr::Env;

/// Emits the sum of every wired input, whatever its name (at least one).
#[derive(Debug, Clone)]
pub struct Adder {
    pub core: BlockCore,
}

impl Adder {
    pub fn new(label: impl Into<String>) -> Self {
        Adder { core: BlockCore::new(label) }
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        if env.is_empty() {
            return Err(SimError::BlockHasNoInputs(self.core.label.clone()));
        }
        self.core.output = env.values().sum();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_every_input() {
        let mut adder = Adder::new("add");
        let env = Env::new().with("a", 1.0).with("b", 2.5);
        adder.compute(&env).unwrap();
        assert_eq!(adder.core.output, 3.5);
    }

    #[test]
    fn no_inputs_is_an_error() {
        let mut adder = Adder::new("add");
        assert!(adder.compute(&Env::new()).is_err());
    }
}
