use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::assessment::Stanine;

/// Identifier wrapper for directory schools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchoolId(pub String);

/// Opaque lookup key for a subject combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombinationId(pub String);

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level senior school pathways under CBC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathwayCode {
    #[serde(rename = "STEM")]
    Stem,
    #[serde(rename = "SOSC")]
    SocialScience,
    #[serde(rename = "ARTS")]
    Arts,
}

impl PathwayCode {
    pub const ALL: [PathwayCode; 3] = [
        PathwayCode::Stem,
        PathwayCode::SocialScience,
        PathwayCode::Arts,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            PathwayCode::Stem => "STEM",
            PathwayCode::SocialScience => "SOSC",
            PathwayCode::Arts => "ARTS",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PathwayCode::Stem => "STEM",
            PathwayCode::SocialScience => "Social Sciences",
            PathwayCode::Arts => "Arts & Sports Science",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "STEM" => Some(PathwayCode::Stem),
            "SOSC" => Some(PathwayCode::SocialScience),
            "ARTS" => Some(PathwayCode::Arts),
            _ => None,
        }
    }
}

impl fmt::Display for PathwayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Placement-relevant attributes captured when the student profile is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    pub gender: Gender,
    pub home_county: String,
    pub home_sub_county: String,
    pub achievement_level: u8,
    pub stanine: Stanine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_county_rank: Option<u32>,
}

/// Output of the pathway-fit scoring process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayFitResult {
    pub student_id: String,
    pub stem_score: f32,
    pub sosc_score: f32,
    pub arts_score: f32,
    pub primary_pathway: PathwayCode,
    pub secondary_pathway: PathwayCode,
    pub confidence: f32,
}

impl PathwayFitResult {
    pub fn score_for(&self, pathway: PathwayCode) -> f32 {
        match pathway {
            PathwayCode::Stem => self.stem_score,
            PathwayCode::SocialScience => self.sosc_score,
            PathwayCode::Arts => self.arts_score,
        }
    }

    /// Whether the designated primary pathway scores at least as high as every other pathway.
    pub fn primary_is_dominant(&self) -> bool {
        let primary = self.score_for(self.primary_pathway);
        PathwayCode::ALL
            .iter()
            .all(|pathway| self.score_for(*pathway) <= primary)
    }
}

/// Named subject bundle within a track of a pathway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCombination {
    pub id: CombinationId,
    pub code: String,
    pub subjects: Vec<String>,
    pub track_code: String,
    pub pathway_code: PathwayCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Accommodation {
    Day,
    Boarding,
    Hybrid,
    #[serde(alias = "DAY & BOARDING")]
    DayAndBoarding,
}

impl Accommodation {
    pub const fn label(self) -> &'static str {
        match self {
            Accommodation::Day => "DAY",
            Accommodation::Boarding => "BOARDING",
            Accommodation::Hybrid => "HYBRID",
            Accommodation::DayAndBoarding => "DAY_AND_BOARDING",
        }
    }
}

/// Competitiveness tier. Codes outside the known set are kept verbatim as `Unclassified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchoolCluster {
    C1,
    C2,
    C3,
    C4,
    Pr,
    Unclassified(String),
}

impl SchoolCluster {
    pub fn from_code(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "C1" => SchoolCluster::C1,
            "C2" => SchoolCluster::C2,
            "C3" => SchoolCluster::C3,
            "C4" => SchoolCluster::C4,
            "PR" => SchoolCluster::Pr,
            _ => SchoolCluster::Unclassified(value.trim().to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            SchoolCluster::C1 => "C1",
            SchoolCluster::C2 => "C2",
            SchoolCluster::C3 => "C3",
            SchoolCluster::C4 => "C4",
            SchoolCluster::Pr => "PR",
            SchoolCluster::Unclassified(code) => code,
        }
    }
}

impl From<String> for SchoolCluster {
    fn from(value: String) -> Self {
        SchoolCluster::from_code(&value)
    }
}

impl From<SchoolCluster> for String {
    fn from(value: SchoolCluster) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenderPolicy {
    Boys,
    Girls,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchoolCategory {
    Regular,
    Sne,
    Integrated,
}

/// Directory record. Read-only for the placement core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    #[serde(alias = "school_name")]
    pub name: String,
    pub county: String,
    pub sub_county: String,
    pub accommodation: Accommodation,
    pub cluster: SchoolCluster,
    #[serde(alias = "sex")]
    pub gender: GenderPolicy,
    pub category: SchoolCategory,
    #[serde(alias = "total_capacity")]
    pub capacity: u32,
}

/// The three slot kinds of a 4-school selection block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionType {
    BoardingOutsideCounty,
    BoardingWithinCounty,
    DayWithinSubCounty,
}

impl SelectionType {
    /// Step order inside a selection block.
    pub const BLOCK_ORDER: [SelectionType; 3] = [
        SelectionType::BoardingOutsideCounty,
        SelectionType::BoardingWithinCounty,
        SelectionType::DayWithinSubCounty,
    ];

    /// Schools of this kind in one 4-school block.
    pub const fn slots_per_block(self) -> usize {
        match self {
            SelectionType::BoardingOutsideCounty => 2,
            SelectionType::BoardingWithinCounty | SelectionType::DayWithinSubCounty => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SelectionType::BoardingOutsideCounty => "BOARDING_OUTSIDE_COUNTY",
            SelectionType::BoardingWithinCounty => "BOARDING_WITHIN_COUNTY",
            SelectionType::DayWithinSubCounty => "DAY_WITHIN_SUB_COUNTY",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            SelectionType::BoardingOutsideCounty => "Boarding (outside county)",
            SelectionType::BoardingWithinCounty => "Boarding (within county)",
            SelectionType::DayWithinSubCounty => "Day school (within sub-county)",
        }
    }
}

/// One annotated school in a recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSlot {
    pub combination_index: usize,
    pub combination_id: CombinationId,
    pub selection_type: SelectionType,
    pub school: School,
    pub safety_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationMetadata {
    pub total_schools: usize,
    pub pathway: String,
    pub pathway_code: PathwayCode,
    pub strategy: String,
    pub combinations_considered: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_combinations: Vec<usize>,
}

/// Flat recommendation list, combination-major then step-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<RecommendationSlot>,
    pub metadata: RecommendationMetadata,
}

impl RecommendationSet {
    pub fn for_combination(&self, index: usize) -> impl Iterator<Item = &RecommendationSlot> {
        self.recommendations
            .iter()
            .filter(move |slot| slot.combination_index == index)
    }
}
