use thiserror::Error;

use crate::extract::PartialProblem;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to acquire problem {id}: {msg}")]
    Acquisition { id: u32, msg: String },
    #[error("failed to parse problem\n{0}")]
    Validation(PartialProblem),
    #[error("invalid memory format: {0}")]
    Format(String),
    #[error("failed in IO: {0}")]
    IO(#[from] std::io::Error),
    #[error("problem cache is corrupted: {0}")]
    Cache(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
    #[error("argument provided is error: {0}")]
    Argument(String),
    #[error("environment error: {0}")]
    Environment(String),
}
