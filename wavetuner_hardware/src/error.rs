use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("device scan failed: {0}")]
    Scan(String),
    #[error("open {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
