use std::sync::Arc;

use tracing::{debug, info, warn};

use super::config::{DirectoryFailurePolicy, PlacementConfig};
use super::directory::{DirectoryError, FilterAccommodation, SchoolDirectory, SchoolFilter};
use super::domain::{
    CombinationId, PathwayCode, PathwayFitResult, RecommendationMetadata, RecommendationSet,
    RecommendationSlot, SelectionType, StudentProfile, SubjectCombination,
};
use super::safety::calculate_safety_score;
use crate::workflows::assessment::Stanine;

/// Combinations considered per recommendation request.
pub const COMBINATIONS_PER_PATHWAY: usize = 3;

const STRATEGY: &str = "BALANCED";

/// Stateless rule engine assembling 4-school blocks per subject combination.
pub struct PlacementEngine<D> {
    directory: Arc<D>,
    config: PlacementConfig,
}

impl<D> PlacementEngine<D>
where
    D: SchoolDirectory,
{
    pub fn new(directory: Arc<D>, config: PlacementConfig) -> Self {
        Self { directory, config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Stanine used for safety scoring under the configured source.
    pub fn safety_stanine(&self, profile: &StudentProfile) -> Stanine {
        self.config.stanine_source.resolve(profile)
    }

    /// Up to three combinations for `pathway`, in directory order.
    pub fn top_combinations(
        &self,
        pathway: PathwayCode,
    ) -> Result<Vec<SubjectCombination>, DirectoryError> {
        let mut combinations = self
            .directory
            .query_combinations(pathway, COMBINATIONS_PER_PATHWAY)?;
        combinations.truncate(COMBINATIONS_PER_PATHWAY);
        Ok(combinations)
    }

    /// Run the three block queries for one combination. Short results are not backfilled.
    pub fn build_selection_block(
        &self,
        combination_index: usize,
        combination: &SubjectCombination,
        profile: &StudentProfile,
    ) -> Result<Vec<RecommendationSlot>, DirectoryError> {
        let (slots, failure) = self.assemble_block(combination_index, combination, profile);
        match failure {
            Some(error) => Err(error),
            None => Ok(slots),
        }
    }

    /// Slots gathered before the first failing step, plus that failure. Later steps are not run.
    fn assemble_block(
        &self,
        combination_index: usize,
        combination: &SubjectCombination,
        profile: &StudentProfile,
    ) -> (Vec<RecommendationSlot>, Option<DirectoryError>) {
        let stanine = self.safety_stanine(profile);
        let mut slots = Vec::with_capacity(4);

        for selection_type in SelectionType::BLOCK_ORDER {
            let filter = block_filter(selection_type, &combination.id, profile);
            let rows = match self.directory.query_schools(&filter) {
                Ok(rows) => rows,
                Err(error) => return (slots, Some(error)),
            };
            let returned = rows.len();

            let accepted: Vec<_> = rows
                .into_iter()
                .filter(|school| {
                    let keep = filter.matches(school);
                    if !keep {
                        warn!(
                            school = %school.id.0,
                            selection_type = selection_type.label(),
                            "directory returned a school outside the step filter"
                        );
                    }
                    keep
                })
                .take(selection_type.slots_per_block())
                .collect();

            debug!(
                combination = %combination.id,
                selection_type = selection_type.label(),
                returned,
                accepted = accepted.len(),
                "selection block step"
            );

            slots.extend(accepted.into_iter().map(|school| RecommendationSlot {
                combination_index,
                combination_id: combination.id.clone(),
                selection_type,
                safety_score: calculate_safety_score(stanine, &school.cluster),
                school,
            }));
        }

        (slots, None)
    }

    /// Recommend schools for the primary pathway, combination-major then step-major.
    pub fn recommend_schools(
        &self,
        profile: &StudentProfile,
        fit: &PathwayFitResult,
    ) -> Result<RecommendationSet, PlacementError> {
        let pathway = fit.primary_pathway;
        if !fit.primary_is_dominant() {
            warn!(
                student = %fit.student_id,
                pathway = pathway.code(),
                "primary pathway does not hold the highest fit score"
            );
        }

        let combinations = self
            .top_combinations(pathway)
            .map_err(|source| PlacementError::Combinations { pathway, source })?;

        let mut recommendations = Vec::new();
        let mut skipped_combinations = Vec::new();

        for (index, combination) in combinations.iter().enumerate() {
            let (block, failure) = self.assemble_block(index, combination, profile);
            if let Some(source) = failure {
                match self.config.failure_policy {
                    DirectoryFailurePolicy::Abort => {
                        return Err(PlacementError::Block {
                            combination_index: index,
                            combination_id: combination.id.clone(),
                            source,
                        });
                    }
                    DirectoryFailurePolicy::SkipCombination => {
                        warn!(
                            combination = %combination.id,
                            index,
                            kept = block.len(),
                            error = %source,
                            "skipping remaining steps after directory failure"
                        );
                        skipped_combinations.push(index);
                    }
                }
            }
            recommendations.extend(block);
        }

        info!(
            student = %profile.id,
            pathway = pathway.code(),
            combinations = combinations.len(),
            schools = recommendations.len(),
            "recommendations assembled"
        );

        Ok(RecommendationSet {
            metadata: RecommendationMetadata {
                total_schools: recommendations.len(),
                pathway: pathway.name().to_string(),
                pathway_code: pathway,
                strategy: STRATEGY.to_string(),
                combinations_considered: combinations.len(),
                skipped_combinations,
            },
            recommendations,
        })
    }
}

fn block_filter(
    selection_type: SelectionType,
    combination_id: &CombinationId,
    profile: &StudentProfile,
) -> SchoolFilter {
    let limit = selection_type.slots_per_block();
    match selection_type {
        SelectionType::BoardingOutsideCounty => {
            SchoolFilter::new(combination_id.clone(), FilterAccommodation::Boarding, limit)
                .excluding_county(profile.home_county.clone())
        }
        SelectionType::BoardingWithinCounty => {
            SchoolFilter::new(combination_id.clone(), FilterAccommodation::Boarding, limit)
                .in_county(profile.home_county.clone())
        }
        SelectionType::DayWithinSubCounty => {
            SchoolFilter::new(combination_id.clone(), FilterAccommodation::Day, limit)
                .in_sub_county(profile.home_sub_county.clone())
        }
    }
}

/// Error raised while assembling a recommendation set.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("combination lookup for pathway {pathway} failed: {source}")]
    Combinations {
        pathway: PathwayCode,
        #[source]
        source: DirectoryError,
    },
    #[error("selection block {combination_index} ({combination_id}) failed: {source}")]
    Block {
        combination_index: usize,
        combination_id: CombinationId,
        #[source]
        source: DirectoryError,
    },
}
