use thiserror::Error;

/// A metric the host could not provide.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("{0} is unavailable on this system")]
    Unavailable(&'static str),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("speech-dispatcher replied {code}: {line}")]
    Protocol { code: u16, line: String },

    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no speech output backend is available")]
    NoBackend,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
