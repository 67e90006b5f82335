//! Grade 10 school placement: subject-combination recommendations, safety scoring, and
//! ministry quota lookups.
//!
//! The engine is request-scoped and holds nothing beyond a shared handle to the
//! [`SchoolDirectory`] and its [`PlacementConfig`]. Every recommendation request issues one
//! combination lookup plus up to nine school queries, and the resulting list is ordered
//! combination-major, then by block step (outside-county boarding, within-county boarding,
//! sub-county day) so callers can lay it onto the 12-slot [`SelectionGrid`] by position.

mod config;
pub mod directory;
pub mod domain;
mod engine;
pub mod grid;
mod quota;
pub mod router;
mod safety;

#[cfg(test)]
mod tests;

pub use config::{DirectoryFailurePolicy, PlacementConfig, StanineSource};
pub use directory::{
    DirectoryError, DirectorySeed, FilterAccommodation, FilterError, InMemorySchoolDirectory,
    SchoolDirectory, SchoolFilter,
};
pub use domain::{
    Accommodation, CombinationId, Gender, GenderPolicy, PathwayCode, PathwayFitResult,
    RecommendationMetadata, RecommendationSet, RecommendationSlot, School, SchoolCategory,
    SchoolCluster, SchoolId, SelectionType, StudentProfile, SubjectCombination,
};
pub use engine::{PlacementEngine, PlacementError, COMBINATIONS_PER_PATHWAY};
pub use grid::{GridError, SelectionGrid, SelectionSlot, GRID_SIZE};
pub use quota::{quota_chance, QuotaChance, TrackType};
pub use router::{placement_router, RecommendationRequest, RecommendationResponse};
pub use safety::{calculate_safety_score, cluster_difficulty};
