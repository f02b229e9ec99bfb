use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("no free cell found after {attempts} attempts")]
    NoFreeCell { attempts: usize },
}
