use crate::block::{Block, BlockCore};
use crate::error::Result;
use crate::expr::{Env, Expr};

/// Memory element: state `x` evolves by `x' = f(x, input)` (trapezoidal),
/// output is `g(x, input)`.
#[derive(Debug, Clone)]
pub struct Ode {
    pub core: BlockCore,
    pub f: Expr,
    pub g: Expr,
    pub f_source: String,
    pub g_source: String,
    /// The constructor's `x0`, kept separate from the evolving `state` so
    /// `sigflow-fmt` can serialize the original `BLOCK` line exactly; the
    /// current state is instead captured as a `STATE` override.
    pub initial: f64,
    state: f64,
    prev_state: Option<f64>,
    prev_input: Option<f64>,
    temp_state: f64,
    pending_input: f64,
}

impl Ode {
    pub fn new(label: impl Into<String>, initial: f64, f_source: &str, g_source: &str) -> Result<Self> {
        let f = Expr::parse(f_source)?;
        let g = Expr::parse(g_source)?;
        Ok(Ode {
            core: BlockCore::new(label),
            f,
            g,
            f_source: f_source.to_string(),
            g_source: g_source.to_string(),
            initial,
            state: initial,
            prev_state: None,
            prev_input: None,
            temp_state: initial,
            pending_input: 0.0,
        })
    }

    fn xy_env(x: f64, y: f64) -> Env {
        Env::new().with("x", x).with("y", y)
    }

    pub(crate) fn compute(&mut self, dt: f64, env: &Env) -> Result<()> {
        let input = Block::require(env, &self.core.label, "input")?;
        let f_now = self.f.evaluate(&Self::xy_env(self.state, input))?;
        self.temp_state = match (self.prev_state, self.prev_input) {
            (Some(px), Some(pin)) => {
                let f_prev = self.f.evaluate(&Self::xy_env(px, pin))?;
                self.state + (dt / 2.0) * (f_now + f_prev)
            }
            _ => self.state + dt * f_now,
        };
        self.pending_input = input;
        Ok(())
    }

    pub(crate) fn commit(&mut self) -> Result<()> {
        self.prev_state = Some(self.state);
        self.prev_input = Some(self.pending_input);
        self.state = self.temp_state;
        self.core.output = self.g.evaluate(&Self::xy_env(self.state, self.pending_input))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_decay_moves_toward_zero() {
        let mut ode = Ode::new("o", 1.0, "-x", "x").unwrap();
        let env = Env::new().with("input", 0.0);
        let start = ode.state;
        ode.compute(0.01, &env).unwrap();
        ode.commit().unwrap();
        assert!(ode.core.output < start);
        assert!(ode.core.output > 0.0);
    }
}
