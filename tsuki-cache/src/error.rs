use eyre::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("field not found in hash")]
    NotFound,
    #[error(transparent)]
    Report(#[from] Report),
}
