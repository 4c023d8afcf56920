use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    #[error("failed to serialize form values: {0}")]
    Serialize(#[from] serde_json::Error),
}
