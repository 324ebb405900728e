use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::Env;

/// Memory element: emits `(input - prev_input) / dt`, zero until a
/// previous sample exists.
#[derive(Debug, Clone)]
pub struct Differentiator {
    pub core: BlockCore,
    prev_input: Option<f64>,
    temp_output: f64,
    pending_input: f64,
}

impl Differentiator {
    pub fn new(label: impl Into<String>) -> Self {
        Differentiator { core: BlockCore::new(label), prev_input: None, temp_output: 0.0, pending_input: 0.0 }
    }

    pub(crate) fn compute(&mut self, dt: f64, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        self.temp_output = match self.prev_input {
            None => self.core.output,
            Some(prev) => (input - prev) / dt,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_committed_step_stays_at_zero() {
        let mut diff = Differentiator::new("d");
        diff.compute(0.1, &Env::new().with("input", 5.0)).unwrap();
        diff.commit().unwrap();
        assert_eq!(diff.core.output, 0.0);
    }

    #[test]
    fn subsequent_step_is_a_finite_difference() {
        let mut diff = Differentiator::new("d");
        diff.compute(0.1, &Env::new().with("input", 1.0)).unwrap();
        diff.commit().unwrap();
        diff.compute(0.1, &Env::new().with("input", 1.5)).unwrap();
        diff.commit().unwrap();
        assert!((diff.core.output - 5.0).abs() < 1e-9);
    }
}
