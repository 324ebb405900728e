pub type Result<T> = std::result::Result<T, SimError>;

/// Errors produced while constructing or stepping a [`crate::simulation::Simulation`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("block (`{0}`) has no inputs")]
    BlockHasNoInputs(String),

    #[error("block (`{0}`) is missing required input `{1}`")]
    MissingRequiredInput(String, String),

    #[error("connection references unknown block index {0}")]
    UnknownBlockIndex(usize),

    #[error("parameter `{0}` has no resolved value")]
    UnresolvedParameter(String),

    #[error("equation `{0}` references undefined name `{1}`")]
    UndefinedEquationName(String, String),

    #[error("expression evaluation failed: {0}")]
    Expression(#[from] crate::expr::ExprError),

    #[error("simulation has no `TIME` configuration")]
    MissingTime,
}
