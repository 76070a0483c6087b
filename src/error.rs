use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoanProofError>;

#[derive(Debug, Error)]
pub enum LoanProofError {
    #[error("solver error: {0}")]
    Solver(#[from] Z3Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum Z3Error {
    #[error("z3 operation failed: {0}")]
    Operation(String),
    #[error("{model} witness failed concrete replay: {detail}")]
    UnsoundWitness { model: &'static str, detail: String },
    #[error("{model} check: expected {expected} got {actual}")]
    VerdictMismatch {
        model: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} '{raw}': {reason}")]
    InvalidValue {
        key: &'static str,
        raw: String,
        reason: String,
    },
}
