use agri_match::error::AppError;
use agri_match::matching::{Aid, AidCatalog, CatalogError};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog snapshot held in memory, optionally seeded from a JSON file of aids.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryAidCatalog {
    aids: Arc<Vec<Aid>>,
}

impl InMemoryAidCatalog {
    pub(crate) fn new(aids: Vec<Aid>) -> Self {
        Self {
            aids: Arc::new(aids),
        }
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            CatalogError::Unavailable(format!("failed to read {}: {err}", path.display()))
        })?;
        let aids: Vec<Aid> = serde_json::from_str(&raw)?;
        Ok(Self::new(aids))
    }

    pub(crate) fn len(&self) -> usize {
        self.aids.len()
    }
}

impl AidCatalog for InMemoryAidCatalog {
    fn active_aids(&self) -> Result<Vec<Aid>, CatalogError> {
        Ok(self
            .aids
            .iter()
            .filter(|aid| aid.is_active())
            .cloned()
            .collect())
    }
}

/// Read and deserialize a JSON document from disk.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
