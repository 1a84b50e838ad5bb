use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed bundle record: {0}")]
    MalformedBundle(String),

    #[error("bundle \"{bundle}\" has a malformed olm.channel property: {reason}")]
    MalformedProperty { bundle: String, reason: String },

    #[error("failed to replace catalog file: {0}")]
    Persist(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
