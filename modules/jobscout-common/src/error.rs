use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobScoutError {
    #[error("Source query error: {0}")]
    SourceQuery(String),

    #[error("Web search error: {0}")]
    WebSearch(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
