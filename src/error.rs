use thiserror::Error;

/// Failures raised while loading trips or computing statistics over them.
/// All of them are terminal for the operation that raised them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unknown source '{0}', expected one of: chicago, new york city, washington")]
    UnknownSource(String),

    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: u64, reason: String },

    #[error("cannot compute {0} over an empty set of trips")]
    EmptySet(&'static str),

    #[error("invalid selection '{value}', expected one of: {}", .allowed.join(", "))]
    InvalidInput { value: String, allowed: Vec<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid source configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => AnalysisError::Io(io),
            other => AnalysisError::MalformedInput {
                line,
                reason: format!("{other:?}"),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
