use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("serial error: {0}")]
    Serial(String),
    #[error("sensor read timeout")]
    Timeout,
    #[error("sensor closed the channel")]
    Disconnected,
    #[error("line is not valid utf-8")]
    Encoding,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
