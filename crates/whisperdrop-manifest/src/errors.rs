use thiserror::Error;

pub type ManifestResult<T> = Result<T, ManifestError>;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error(
        "Duplicate allocation: recipient {recipient} with nonce {nonce} \
         appears at rows {first_row} and {duplicate_row}"
    )]
    DuplicateAllocation {
        recipient: String,
        nonce: String,
        first_row: usize,
        duplicate_row: usize,
    },

    #[error("Tree construction failed: {0}")]
    Tree(#[from] whisperdrop_merkle::TreeError),
}
