use serde::{Deserialize, Serialize};

use super::domain::StudentProfile;
use crate::workflows::assessment::Stanine;

/// What a recommendation request does when a directory query fails mid-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryFailurePolicy {
    /// Propagate the first failure to the caller.
    #[default]
    Abort,
    /// Keep the slots gathered before the failing step, skip the rest of that block, and
    /// continue with the next combination.
    SkipCombination,
}

/// Which stanine feeds the safety score of each recommended school.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StanineSource {
    #[default]
    Profile,
    Fixed(Stanine),
}

impl StanineSource {
    pub fn resolve(self, profile: &StudentProfile) -> Stanine {
        match self {
            StanineSource::Profile => profile.stanine,
            StanineSource::Fixed(stanine) => stanine,
        }
    }
}

/// Engine configuration. Immutable for the lifetime of an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub failure_policy: DirectoryFailurePolicy,
    pub stanine_source: StanineSource,
}
