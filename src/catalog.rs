use std::collections::HashSet;

use config::{Config, File, FileFormat, Source};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Branch, BranchInfo, ClassRecord, TrainingType, TrainingTypeInfo};

const EMBEDDED_CATALOG: &str = include_str!("../data/studio.toml");

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("regex compiles"));

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Duplicate class id `{0}`")]
    DuplicateId(String),
    #[error("Class `{id}` has malformed time `{value}`, expected HH:MM")]
    MalformedTime { id: String, value: String },
    #[error("Class `{id}` ends at {end} which is not after its start {start}")]
    EmptyTimeSlot {
        id: String,
        start: String,
        end: String,
    },
    #[error("Class `{0}` has no participant capacity")]
    ZeroCapacity(String),
    #[error("Class `{id}` refers to branch `{branch}` which has no branch entry")]
    UnknownBranch { id: String, branch: Branch },
    #[error("Class `{id}` refers to training type `{training_type}` which has no description")]
    UnknownTrainingType {
        id: String,
        training_type: TrainingType,
    },
}

/// Static studio content the site is built from.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub branches: Vec<BranchInfo>,
    pub training_types: Vec<TrainingTypeInfo>,
    pub classes: Vec<ClassRecord>,
}

impl Catalog {
    /// Loads `path` when given, the catalog compiled into the binary otherwise.
    pub fn load(path: Option<&str>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => {
                info!("Loading catalog from {path}");
                Self::from_source(File::new(path, FileFormat::Toml))?
            }
            None => Self::from_toml_str(EMBEDDED_CATALOG)?,
        };
        debug!(
            branches = catalog.branches.len(),
            training_types = catalog.training_types.len(),
            classes = catalog.classes.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        Self::from_source(File::from_str(source, FileFormat::Toml))
    }

    fn from_source<S>(source: S) -> Result<Self, CatalogError>
    where
        S: Source + Send + Sync + 'static,
    {
        let catalog: Catalog = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn branch(&self, id: Branch) -> Option<&BranchInfo> {
        self.branches.iter().find(|branch| branch.id == id)
    }

    pub fn training_type(&self, id: TrainingType) -> Option<&TrainingTypeInfo> {
        self.training_types.iter().find(|info| info.id == id)
    }

    // Participant counts above capacity are accepted as authored.
    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.id.as_str()) {
                return Err(CatalogError::DuplicateId(class.id.clone()));
            }
            for value in [&class.start_time, &class.end_time] {
                if !CLOCK_TIME.is_match(value) {
                    return Err(CatalogError::MalformedTime {
                        id: class.id.clone(),
                        value: value.clone(),
                    });
                }
            }
            if class.start_time >= class.end_time {
                return Err(CatalogError::EmptyTimeSlot {
                    id: class.id.clone(),
                    start: class.start_time.clone(),
                    end: class.end_time.clone(),
                });
            }
            if class.max_participants == 0 {
                return Err(CatalogError::ZeroCapacity(class.id.clone()));
            }
            if self.branch(class.branch).is_none() {
                return Err(CatalogError::UnknownBranch {
                    id: class.id.clone(),
                    branch: class.branch,
                });
            }
            if self.training_type(class.training_type).is_none() {
                return Err(CatalogError::UnknownTrainingType {
                    id: class.id.clone(),
                    training_type: class.training_type,
                });
            }
        }
        Ok(())
    }
}
