//! Errors which can occur while building the lunch calendar.

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing or a setting has an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A date specifier is neither a keyword, a duration nor a `MM-DD-YYYY` date.
    #[error("invalid date `{input}`: {reason}")]
    DateParse { input: String, reason: String },

    /// The menu server answered with a non-success status.
    #[error("error fetching menu, HTTP status {status}: {body}")]
    Fetch { status: StatusCode, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body is not valid menu JSON.
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// The date of a single menu day could not be parsed.
    ///
    /// This one is recoverable, the day is skipped.
    #[error("invalid menu day date `{0}`")]
    DayDate(String),
}

impl Error {
    pub(crate) fn date_parse(input: &str, reason: impl ToString) -> Self {
        Error::DateParse {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::error::Error;

    #[test]
    fn test_fetch_message() {
        let error = Error::Fetch {
            status: StatusCode::NOT_FOUND,
            body: "no such building".into(),
        };
        let message = error.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("no such building"));
    }
}
