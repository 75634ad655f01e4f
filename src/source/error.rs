#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("Bad source URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Trip table is missing column {0}")]
    MissingColumn(&'static str),
}

pub type SourceResult<T> = Result<T, SourceError>;
