pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0} declares no TIME horizon; pass --horizon")]
    NoHorizon(String),

    #[error(transparent)]
    Format(#[from] sigflow_fmt::FormatError),

    #[error(transparent)]
    Simulation(#[from] sigflow_core::SimError),
}
