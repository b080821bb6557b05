use thiserror::Error;

/// All possible errors that can occur while loading or validating training data
#[derive(Error, Debug)]
pub enum TrainingDataError {
    /// Errors that occur while reading a training file from disk
    #[error("Failed to read training file: {0}")]
    Io(#[from] std::io::Error),

    /// Errors that occur during YAML parsing of a required document
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A supplied training data path does not exist or has the wrong kind
    #[error("Invalid training data path: {0}")]
    InvalidPath(String),

    /// The multiflow stories document existed but could not be loaded.
    /// The underlying cause is logged when the document is read.
    #[error("Invalid multiflow_stories.yml. Check logs!")]
    InvalidMultiflowDocument,

    /// Strict-mode validation found at least one issue
    #[error("Invalid training data")]
    ValidationFailed,
}
