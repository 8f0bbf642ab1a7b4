use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::matching::catalog::{AidCatalog, CatalogError};
use crate::matching::domain::{
    Aid, AidAmount, AidCriteria, AidId, AidStatus, FarmerProfile, LegalStatus, ProductionType,
    ProfileId, ProjectType,
};
use crate::matching::ranking::BatchRanker;
use crate::matching::service::MatchingService;

pub(super) fn profile() -> FarmerProfile {
    FarmerProfile {
        profile_id: ProfileId("farm-001".to_string()),
        region: "Occitanie".to_string(),
        department: "34".to_string(),
        age: Some(35),
        young_farmer: false,
        legal_status: LegalStatus::Earl,
        total_surface: 80.0,
        productions: BTreeSet::from([ProductionType::Cereals]),
        projects: BTreeSet::from([ProjectType::Modernisation]),
        labels: BTreeSet::from(["AB".to_string()]),
    }
}

pub(super) fn aid(id: &str) -> Aid {
    Aid {
        aid_id: AidId(id.to_string()),
        title: format!("Aid {id}"),
        description: String::new(),
        funding_body: "Region".to_string(),
        programme: String::new(),
        source: "catalog".to_string(),
        source_url: String::new(),
        status: AidStatus::Active,
        opens_on: None,
        deadline: None,
        confidence: 1.0,
        tags: Vec::new(),
        criteria: AidCriteria::default(),
        amount: AidAmount::default(),
    }
}

pub(super) fn aid_with(id: &str, configure: impl FnOnce(&mut AidCriteria)) -> Aid {
    let mut aid = aid(id);
    configure(&mut aid.criteria);
    aid
}

pub(super) fn labels(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    aids: Vec<Aid>,
}

impl MemoryCatalog {
    pub(super) fn with_aids(aids: Vec<Aid>) -> Self {
        Self { aids }
    }
}

impl AidCatalog for MemoryCatalog {
    fn active_aids(&self) -> Result<Vec<Aid>, CatalogError> {
        Ok(self.aids.iter().filter(|aid| aid.is_active()).cloned().collect())
    }
}

pub(super) struct UnavailableCatalog;

impl AidCatalog for UnavailableCatalog {
    fn active_aids(&self) -> Result<Vec<Aid>, CatalogError> {
        Err(CatalogError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn service_with(aids: Vec<Aid>) -> Arc<MatchingService<MemoryCatalog>> {
    Arc::new(MatchingService::new(
        Arc::new(MemoryCatalog::with_aids(aids)),
        BatchRanker::new(false),
        10,
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
