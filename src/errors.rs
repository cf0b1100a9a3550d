use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum IngestError {
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Config error: {0}")]
    Config(String),
}
