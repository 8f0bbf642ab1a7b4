use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog aids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AidId(pub String);

/// Identifier wrapper for farmer profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl fmt::Display for AidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Agricultural production held by a farm or accepted by an aid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionType {
    Cereals,
    MarketGarden,
    Viticulture,
    Arboriculture,
    BeefCattle,
    Sheep,
    Goats,
    Pigs,
    Poultry,
    Dairy,
    FieldCrops,
    Horticulture,
    Beekeeping,
    Aquaculture,
}

impl ProductionType {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Cereals => "CEREALS",
            Self::MarketGarden => "MARKET_GARDEN",
            Self::Viticulture => "VITICULTURE",
            Self::Arboriculture => "ARBORICULTURE",
            Self::BeefCattle => "BEEF_CATTLE",
            Self::Sheep => "SHEEP",
            Self::Goats => "GOATS",
            Self::Pigs => "PIGS",
            Self::Poultry => "POULTRY",
            Self::Dairy => "DAIRY",
            Self::FieldCrops => "FIELD_CROPS",
            Self::Horticulture => "HORTICULTURE",
            Self::Beekeeping => "BEEKEEPING",
            Self::Aquaculture => "AQUACULTURE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cereals => "Céréales",
            Self::MarketGarden => "Maraîchage",
            Self::Viticulture => "Viticulture",
            Self::Arboriculture => "Arboriculture",
            Self::BeefCattle => "Élevage bovin",
            Self::Sheep => "Élevage ovin",
            Self::Goats => "Élevage caprin",
            Self::Pigs => "Élevage porcin",
            Self::Poultry => "Élevage avicole",
            Self::Dairy => "Élevage laitier",
            Self::FieldCrops => "Grandes cultures",
            Self::Horticulture => "Horticulture",
            Self::Beekeeping => "Apiculture",
            Self::Aquaculture => "Aquaculture",
        }
    }
}

/// Kind of project a farmer is pursuing or an aid finances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    Installation,
    OrganicConversion,
    Modernisation,
    Diversification,
    Irrigation,
    Building,
    Equipment,
    Energy,
    Environment,
    Training,
    Marketing,
    Digital,
    AnimalWelfare,
}

impl ProjectType {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Installation => "INSTALLATION",
            Self::OrganicConversion => "ORGANIC_CONVERSION",
            Self::Modernisation => "MODERNISATION",
            Self::Diversification => "DIVERSIFICATION",
            Self::Irrigation => "IRRIGATION",
            Self::Building => "BUILDING",
            Self::Equipment => "EQUIPMENT",
            Self::Energy => "ENERGY",
            Self::Environment => "ENVIRONMENT",
            Self::Training => "TRAINING",
            Self::Marketing => "MARKETING",
            Self::Digital => "DIGITAL",
            Self::AnimalWelfare => "ANIMAL_WELFARE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Installation => "Installation",
            Self::OrganicConversion => "Conversion bio",
            Self::Modernisation => "Modernisation",
            Self::Diversification => "Diversification",
            Self::Irrigation => "Irrigation",
            Self::Building => "Bâtiment",
            Self::Equipment => "Matériel",
            Self::Energy => "Énergie",
            Self::Environment => "Environnement",
            Self::Training => "Formation",
            Self::Marketing => "Commercialisation",
            Self::Digital => "Numérique",
            Self::AnimalWelfare => "Bien-être animal",
        }
    }
}

/// Legal form of the farming business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalStatus {
    Individual,
    Earl,
    Gaec,
    Scea,
    Sa,
    Cuma,
    Cooperative,
    Gie,
    Other,
}

impl LegalStatus {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Individual => "INDIVIDUAL",
            Self::Earl => "EARL",
            Self::Gaec => "GAEC",
            Self::Scea => "SCEA",
            Self::Sa => "SA",
            Self::Cuma => "CUMA",
            Self::Cooperative => "COOPERATIVE",
            Self::Gie => "GIE",
            Self::Other => "OTHER",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "Exploitation individuelle",
            Self::Earl => "EARL",
            Self::Gaec => "GAEC",
            Self::Scea => "SCEA",
            Self::Sa => "SA",
            Self::Cuma => "CUMA",
            Self::Cooperative => "Coopérative",
            Self::Gie => "GIE",
            Self::Other => "Autre",
        }
    }
}

/// Payment model discriminator for an aid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmountKind {
    #[default]
    Flat,
    Percentage,
    PerSurface,
    PerHead,
    PerUnit,
}

/// Publication state of an aid in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AidStatus {
    #[default]
    Active,
    Inactive,
    Expired,
}

/// Eligibility constraints attached to an aid. Empty collections and unset bounds are unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AidCriteria {
    pub regions: Vec<String>,
    pub departments: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub young_farmer_required: Option<bool>,
    pub surface_min: Option<f64>,
    pub surface_max: Option<f64>,
    pub head_count_min: Option<u32>,
    pub head_count_max: Option<u32>,
    pub revenue_min: Option<f64>,
    pub revenue_max: Option<f64>,
    pub production_types: BTreeSet<ProductionType>,
    pub project_types: BTreeSet<ProjectType>,
    pub legal_statuses: BTreeSet<LegalStatus>,
    pub required_labels: BTreeSet<String>,
    pub bonus_labels: BTreeSet<String>,
}

impl AidCriteria {
    pub fn restricts_geography(&self) -> bool {
        !self.regions.is_empty() || !self.departments.is_empty()
    }

    /// A `young_farmer_required` of `Some(false)` does not restrict anything.
    pub fn restricts_age(&self) -> bool {
        self.age_min.is_some() || self.age_max.is_some() || self.young_farmer_required == Some(true)
    }

    pub fn restricts_surface(&self) -> bool {
        self.surface_min.is_some() || self.surface_max.is_some()
    }
}

/// Payment model and amounts of an aid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AidAmount {
    pub kind: AmountKind,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub ceiling: Option<f64>,
    pub per_unit_amount: Option<f64>,
    pub unit: Option<String>,
}

fn full_confidence() -> f64 {
    1.0
}

/// Funding aid as supplied by the catalog, already normalized by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aid {
    pub aid_id: AidId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub funding_body: String,
    #[serde(default)]
    pub programme: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub status: AidStatus,
    #[serde(default)]
    pub opens_on: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default = "full_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub criteria: AidCriteria,
    #[serde(default)]
    pub amount: AidAmount,
}

impl Aid {
    pub fn is_active(&self) -> bool {
        self.status == AidStatus::Active
    }
}

/// Canonical farmer profile consumed by both evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    #[serde(default)]
    pub profile_id: ProfileId,
    pub region: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub young_farmer: bool,
    pub legal_status: LegalStatus,
    /// Utilized agricultural area in hectares.
    pub total_surface: f64,
    #[serde(default)]
    pub productions: BTreeSet<ProductionType>,
    #[serde(default)]
    pub projects: BTreeSet<ProjectType>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}
