//! Named, late-bound scalars and the `lhs = rhs` equation pre-solver.
//!
//! A [`ParameterTable`] holds the parameters declared before the blocks that
//! reference them are constructed. [`Equation`] binds one parameter from an
//! expression over the others, in declaration order, exactly mirroring the
//! way the text format lists `PARAMETER` and `EQUATION` lines interleaved.

use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::expr::{Env, Expr};

/// A named scalar that may not yet have a value.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub value: Option<f64>,
}

impl Parameter {
    pub fn unbound(name: impl Into<String>) -> Self {
        Parameter { name: name.into(), value: None }
    }

    pub fn bound(name: impl Into<String>, value: f64) -> Self {
        Parameter { name: name.into(), value: Some(value) }
    }
}

/// The set of parameters known at a given point in construction.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    values: HashMap<String, Option<f64>>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, parameter: Parameter) {
        self.values.insert(parameter.name, parameter.value);
    }

    /// Bind (or rebind) a parameter to a concrete value.
    pub fn bind(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), Some(value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    /// Resolve a value by name, erroring if the parameter is declared but
    /// not yet bound, or was never declared at all.
    pub fn resolve(&self, name: &str) -> Result<f64> {
        match self.values.get(name) {
            Some(Some(v)) => Ok(*v),
            Some(None) => Err(SimError::UnresolvedParameter(name.to_string())),
            None => Err(SimError::UnresolvedParameter(name.to_string())),
        }
    }

    /// Build an [`Env`] snapshot of every currently-bound parameter, for
    /// evaluating an equation's right-hand side.
    fn env(&self) -> Env {
        let mut env = Env::new();
        for (name, value) in &self.values {
            if let Some(v) = value {
                env.set(name, *v);
            }
        }
        env
    }
}

/// A single `lhs = rhs` pre-solver equation.
#[derive(Debug, Clone)]
pub struct Equation {
    pub lhs: String,
    pub rhs: Expr,
}

impl Equation {
    /// Parse `"lhs = rhs"` into a compiled equation.
    pub fn parse(source: &str) -> Result<Equation> {
        let (lhs, rhs) = source
            .split_once('=')
            .ok_or_else(|| SimError::UndefinedEquationName(source.to_string(), "=".to_string()))?;
        let lhs = lhs.trim().to_string();
        let rhs = Expr::parse(rhs.trim())?;
        Ok(Equation { lhs, rhs })
    }

    /// Evaluate `rhs` over the currently-known parameters and bind `lhs`.
    pub fn apply(&self, table: &mut ParameterTable) -> Result<()> {
        let env = table.env();
        let value = self.rhs.evaluate(&env).map_err(|e| match e {
            crate::expr::ExprError::UndefinedName(name) => {
                SimError::UndefinedEquationName(self.lhs.clone(), name)
            }
            other => SimError::Expression(other),
        })?;
        table.bind(self.lhs.clone(), value);
        Ok(())
    }
}

/// Run every equation in order against `table`, binding each `lhs` in turn.
pub fn solve_equations(table: &mut ParameterTable, equations: &[Equation]) -> Result<()> {
    for equation in equations {
        equation.apply(table)?;
    }
    Ok(())
}
