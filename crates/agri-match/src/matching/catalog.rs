use super::domain::Aid;

/// Source of aids to rank. Ingestion and storage live outside this crate.
pub trait AidCatalog: Send + Sync {
    /// Aids currently open for matching; implementations filter out inactive records.
    fn active_aids(&self) -> Result<Vec<Aid>, CatalogError>;
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("aid catalog unavailable: {0}")]
    Unavailable(String),
    #[error("aid catalog could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}
