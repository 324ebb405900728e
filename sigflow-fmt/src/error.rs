pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors produced while parsing or writing the text simulation format
/// (spec §6). Follows the same shape as `sigflow_core::SimError`.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown line prefix `{0}`")]
    UnknownLinePrefix(String),

    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),

    #[error("malformed arguments on line: {0}")]
    MalformedArguments(String),

    #[error("no `TIME` line in file")]
    MissingTime,

    #[error("reference to undeclared id `{0}`")]
    UnknownId(String),

    #[error("duplicate block id `{0}`")]
    DuplicateId(String),

    #[error(transparent)]
    Simulation(#[from] sigflow_core::SimError),

    #[error(transparent)]
    Expression(#[from] sigflow_core::expr::ExprError),
}
