use akili_pathways::config::{ConfigError, DirectoryConfig};
use akili_pathways::error::AppError;
use akili_pathways::workflows::placement::{DirectorySeed, InMemorySchoolDirectory};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

const BUNDLED_COMBINATIONS: &str = include_str!("../data/combinations.csv");
const BUNDLED_SCHOOLS: &str = include_str!("../data/schools.csv");
const BUNDLED_OFFERINGS: &str = include_str!("../data/offerings.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Directory for the configured seed. A missing seed directory is a configuration error.
pub(crate) fn load_directory(
    config: &DirectoryConfig,
) -> Result<InMemorySchoolDirectory, AppError> {
    let dir = config.seed_dir.as_ref().ok_or(ConfigError::MissingSeedDir)?;
    let directory = DirectorySeed::from_dir(dir)?;
    info!(
        seed_dir = %dir.display(),
        schools = directory.school_count(),
        combinations = directory.combination_count(),
        "school directory loaded"
    );
    Ok(directory)
}

/// Sample directory compiled into the binary for demos.
pub(crate) fn bundled_directory() -> Result<InMemorySchoolDirectory, AppError> {
    let directory = DirectorySeed::from_readers(
        Cursor::new(BUNDLED_COMBINATIONS),
        Cursor::new(BUNDLED_SCHOOLS),
        Cursor::new(BUNDLED_OFFERINGS),
    )?;
    Ok(directory)
}

pub(crate) fn read_json_file<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path)?;
    let value = serde_json::from_str(&raw)?;
    Ok(value)
}
