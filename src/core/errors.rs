use thiserror::Error;

#[derive(Error, Debug)]
pub enum OkurigoError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("HTTP error {0} from {1}")]
    BadStatus(reqwest::StatusCode, String),

    #[error("Malformed checkpoint file: {0}")]
    MalformedCheckpoint(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Failed to load file: {0}")]
    FailedToLoadFile(String),

    #[error("OkurigoError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for OkurigoError {
    fn from(error: std::io::Error) -> Self {
        OkurigoError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for OkurigoError {
    fn from(error: reqwest::Error) -> Self {
        OkurigoError::Reqwest(Box::new(error))
    }
}
