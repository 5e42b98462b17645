use thiserror::Error;

/// Failures of a single lookup cycle (geocode or forecast).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The place name was empty; nothing was requested.
    #[error("No location entered")]
    EmptyQuery,

    /// The geocoding service returned no candidates.
    #[error("Location not found!")]
    NotFound,

    /// Network failure, unexpected status or a body we could not parse.
    /// The message is the underlying failure text.
    #[error("{0}")]
    Transport(String),

    /// The forecast's daily arrays are not index-aligned.
    #[error(
        "Forecast daily arrays have mismatched lengths \
         (time: {time}, weathercode: {codes}, min: {min}, max: {max})"
    )]
    MismatchedDaily {
        time: usize,
        codes: usize,
        min: usize,
        max: usize,
    },
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}
