use crate::block::BlockCore;
use crate::error::Result;
use crate::expr::{Env, Expr};

/// Emits `f(time)` every tick; `f` is compiled once at load. Keeps its
/// original source text alongside the compiled AST so `sigflow-fmt` can
/// round-trip a `Generator "sin(t)"` line exactly.
#[derive(Debug, Clone)]
pub struct Generator {
    pub core: BlockCore,
    pub f: Expr,
    pub source: String,
}

impl Generator {
    pub fn new(label: impl Into<String>, source: &str) -> Result<Self> {
        let f = Expr::parse(source)?;
        Ok(Generator { core: BlockCore::new(label), f, source: source.to_string() })
    }

    pub(crate) fn compute(&mut self, t: f64) -> Result<()> {
        let env = Env::new().with("t", t);
        self.core.output = self.f.evaluate(&env)?;
        Ok(())
    }
}
