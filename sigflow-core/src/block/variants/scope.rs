use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::Env;

/// Pass-through block; its presence marks a signal the caller wants
/// recorded under `label`.
#[derive(Debug, Clone)]
pub struct Scope {
    pub core: BlockCore,
    pub label: String,
}

impl Scope {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Scope { core: BlockCore::new(id), label: label.into() }
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        self.core.output = input;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_its_input_through() {
        let mut scope = Scope::new("s1", "velocity");
        scope.compute(&Env::new().with("input", 9.0)).unwrap();
        assert_eq!(scope.core.output, 9.0);
    }
}
