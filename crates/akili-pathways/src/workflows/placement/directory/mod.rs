mod memory;
mod seed;

pub use memory::InMemorySchoolDirectory;
pub use seed::DirectorySeed;

use serde::{Deserialize, Serialize};

use super::domain::{Accommodation, CombinationId, PathwayCode, School, SubjectCombination};

/// Read-only query surface over the school and combination reference data.
pub trait SchoolDirectory: Send + Sync {
    /// Combinations owned by `pathway`, in directory order, at most `limit` rows.
    fn query_combinations(
        &self,
        pathway: PathwayCode,
        limit: usize,
    ) -> Result<Vec<SubjectCombination>, DirectoryError>;

    /// Schools offering the filter's combination that satisfy every set predicate.
    fn query_schools(&self, filter: &SchoolFilter) -> Result<Vec<School>, DirectoryError>;
}

/// Accommodation values a school query can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterAccommodation {
    Day,
    Boarding,
}

impl FilterAccommodation {
    pub const fn as_accommodation(self) -> Accommodation {
        match self {
            FilterAccommodation::Day => Accommodation::Day,
            FilterAccommodation::Boarding => Accommodation::Boarding,
        }
    }
}

/// Declarative school query. Geographic predicates are exact matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolFilter {
    pub combination_id: CombinationId,
    pub accommodation: FilterAccommodation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_county: Option<String>,
    pub limit: usize,
}

impl SchoolFilter {
    pub fn new(
        combination_id: CombinationId,
        accommodation: FilterAccommodation,
        limit: usize,
    ) -> Self {
        Self {
            combination_id,
            accommodation,
            county: None,
            exclude_county: None,
            sub_county: None,
            limit,
        }
    }

    pub fn in_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    pub fn excluding_county(mut self, county: impl Into<String>) -> Self {
        self.exclude_county = Some(county.into());
        self
    }

    pub fn in_sub_county(mut self, sub_county: impl Into<String>) -> Self {
        self.sub_county = Some(sub_county.into());
        self
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.county.is_some() && self.exclude_county.is_some() {
            return Err(FilterError::ConflictingCountyFilters);
        }
        if self.limit == 0 {
            return Err(FilterError::ZeroLimit);
        }
        Ok(())
    }

    /// Accommodation and geographic predicates. Combination membership is the directory's concern.
    pub fn matches(&self, school: &School) -> bool {
        if school.accommodation != self.accommodation.as_accommodation() {
            return false;
        }
        if let Some(county) = &self.county {
            if &school.county != county {
                return false;
            }
        }
        if let Some(excluded) = &self.exclude_county {
            if &school.county == excluded {
                return false;
            }
        }
        if let Some(sub_county) = &self.sub_county {
            if &school.sub_county != sub_county {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("county and exclude_county cannot both be set")]
    ConflictingCountyFilters,
    #[error("query limit must be at least 1")]
    ZeroLimit,
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error("directory query failed: {0}")]
    Query(String),
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),
    #[error("directory seed invalid: {0}")]
    Seed(String),
}
