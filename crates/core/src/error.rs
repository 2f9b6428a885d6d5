#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("error creating a local folder of results for deal {deal_id}: {source}")]
    ResultsDir {
        deal_id: String,
        #[source]
        source: std::io::Error,
    },
}
