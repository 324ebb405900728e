use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::{Env, Expr};

/// Emits `g(input)` for a compiled expression `g` over the variable `x`.
#[derive(Debug, Clone)]
pub struct Function {
    pub core: BlockCore,
    pub g: Expr,
    pub source: String,
}

impl Function {
    pub fn new(label: impl Into<String>, source: &str) -> Result<Self> {
        let g = Expr::parse(source)?;
        Ok(Function { core: BlockCore::new(label), g, source: source.to_string() })
    }

    pub(crate) fn compute(&mut self, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        let inner = Env::new().with("x", input);
        self.core.output = self.g.evaluate(&inner)?;
        Ok(())
    }
}
