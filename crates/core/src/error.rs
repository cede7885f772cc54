use thiserror::Error;

/// Top-level error type shared by the collector, transport and dashboard.
#[derive(Debug, Error)]
pub enum McError {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = McError> = std::result::Result<T, E>;
