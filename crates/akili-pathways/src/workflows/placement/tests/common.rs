use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::Stanine;
use crate::workflows::placement::directory::{
    DirectoryError, FilterAccommodation, InMemorySchoolDirectory, SchoolDirectory, SchoolFilter,
};
use crate::workflows::placement::domain::{
    Accommodation, CombinationId, Gender, GenderPolicy, PathwayCode, PathwayFitResult, School,
    SchoolCategory, SchoolCluster, SchoolId, StudentProfile, SubjectCombination,
};
use crate::workflows::placement::{PlacementConfig, PlacementEngine};

pub(super) const HOME_COUNTY: &str = "Kisumu";
pub(super) const HOME_SUB_COUNTY: &str = "Kisumu East";

pub(super) fn stanine(value: u8) -> Stanine {
    Stanine::new(value).expect("valid stanine")
}

pub(super) fn profile() -> StudentProfile {
    StudentProfile {
        id: "student-042".to_string(),
        gender: Gender::Female,
        home_county: HOME_COUNTY.to_string(),
        home_sub_county: HOME_SUB_COUNTY.to_string(),
        achievement_level: 7,
        stanine: stanine(6),
        sub_county_rank: Some(4),
    }
}

pub(super) fn pathway_fit(primary: PathwayCode) -> PathwayFitResult {
    PathwayFitResult {
        student_id: "student-042".to_string(),
        stem_score: if primary == PathwayCode::Stem { 84.0 } else { 52.0 },
        sosc_score: if primary == PathwayCode::SocialScience { 79.0 } else { 48.0 },
        arts_score: if primary == PathwayCode::Arts { 75.0 } else { 31.0 },
        primary_pathway: primary,
        secondary_pathway: if primary == PathwayCode::Stem {
            PathwayCode::SocialScience
        } else {
            PathwayCode::Stem
        },
        confidence: 0.72,
    }
}

pub(super) fn combination(id: &str, pathway: PathwayCode, track: &str) -> SubjectCombination {
    SubjectCombination {
        id: CombinationId(id.to_string()),
        code: id.to_ascii_uppercase(),
        subjects: vec!["Mathematics".to_string(), "English".to_string()],
        track_code: track.to_string(),
        pathway_code: pathway,
    }
}

pub(super) fn school(
    id: &str,
    county: &str,
    sub_county: &str,
    accommodation: Accommodation,
    cluster: SchoolCluster,
) -> School {
    School {
        id: SchoolId(id.to_string()),
        name: format!("{id} school"),
        county: county.to_string(),
        sub_county: sub_county.to_string(),
        accommodation,
        cluster,
        gender: GenderPolicy::Mixed,
        category: SchoolCategory::Regular,
        capacity: 480,
    }
}

/// Reference directory used across the engine, grid, and routing tests.
///
/// STEM has four combinations (`pcb`, `pcm`, `cbg`, `agr`); SOSC has two (`hbk`, `hgc`);
/// ARTS has none.
pub(super) fn seeded_directory() -> InMemorySchoolDirectory {
    let mut directory = InMemorySchoolDirectory::new();
    for (id, pathway, track) in [
        ("pcb", PathwayCode::Stem, "PURE_SCI"),
        ("pcm", PathwayCode::Stem, "PURE_SCI"),
        ("hbk", PathwayCode::SocialScience, "HUM_BUS"),
        ("cbg", PathwayCode::Stem, "APP_SCI"),
        ("hgc", PathwayCode::SocialScience, "HUM_BUS"),
        ("agr", PathwayCode::Stem, "APP_SCI"),
    ] {
        directory.add_combination(combination(id, pathway, track));
    }

    for school in [
        school("alliance", "Kiambu", "Kikuyu", Accommodation::Boarding, SchoolCluster::C1),
        school("kagumo", "Nyeri", "Nyeri Central", Accommodation::Boarding, SchoolCluster::C1),
        school("mangu", "Kiambu", "Thika", Accommodation::Boarding, SchoolCluster::C2),
        school("maseno", HOME_COUNTY, "Kisumu West", Accommodation::Boarding, SchoolCluster::C1),
        school(
            "kisumu-boys",
            HOME_COUNTY,
            "Kisumu Central",
            Accommodation::Boarding,
            SchoolCluster::C2,
        ),
        school("kisumu-day", HOME_COUNTY, HOME_SUB_COUNTY, Accommodation::Day, SchoolCluster::C4),
        school("nyanza-day", HOME_COUNTY, HOME_SUB_COUNTY, Accommodation::Day, SchoolCluster::Pr),
    ] {
        directory.add_school(school);
    }

    let offerings: [(&str, &[&str]); 7] = [
        ("pcb", &["alliance", "kagumo", "mangu", "maseno"]),
        ("pcb", &["kisumu-boys", "kisumu-day", "nyanza-day"]),
        ("pcm", &["alliance", "maseno", "kisumu-day"]),
        ("cbg", &["kagumo"]),
        ("agr", &["alliance", "kagumo", "maseno", "kisumu-day"]),
        ("hbk", &["mangu", "kisumu-boys", "kisumu-day"]),
        ("hgc", &["alliance", "nyanza-day"]),
    ];
    for (combination_id, schools) in offerings {
        for school_id in schools {
            directory
                .offer(
                    &SchoolId(school_id.to_string()),
                    &CombinationId(combination_id.to_string()),
                )
                .expect("offering registers");
        }
    }

    directory
}

pub(super) fn engine_with<D: SchoolDirectory>(
    directory: D,
    config: PlacementConfig,
) -> PlacementEngine<D> {
    PlacementEngine::new(Arc::new(directory), config)
}

pub(super) fn seeded_engine() -> PlacementEngine<InMemorySchoolDirectory> {
    engine_with(seeded_directory(), PlacementConfig::default())
}

/// Ignores every predicate and returns the same rows for each school query.
pub(super) struct UnfilteredDirectory {
    pub(super) combinations: Vec<SubjectCombination>,
    pub(super) schools: Vec<School>,
}

impl SchoolDirectory for UnfilteredDirectory {
    fn query_combinations(
        &self,
        _pathway: PathwayCode,
        _limit: usize,
    ) -> Result<Vec<SubjectCombination>, DirectoryError> {
        Ok(self.combinations.clone())
    }

    fn query_schools(&self, _filter: &SchoolFilter) -> Result<Vec<School>, DirectoryError> {
        Ok(self.schools.clone())
    }
}

/// Fails school queries for one combination and delegates the rest. With `failing_step` set,
/// only queries for that accommodation fail.
pub(super) struct FailingCombinationDirectory {
    pub(super) inner: InMemorySchoolDirectory,
    pub(super) failing: CombinationId,
    pub(super) failing_step: Option<FilterAccommodation>,
}

impl SchoolDirectory for FailingCombinationDirectory {
    fn query_combinations(
        &self,
        pathway: PathwayCode,
        limit: usize,
    ) -> Result<Vec<SubjectCombination>, DirectoryError> {
        self.inner.query_combinations(pathway, limit)
    }

    fn query_schools(&self, filter: &SchoolFilter) -> Result<Vec<School>, DirectoryError> {
        let step_fails = self
            .failing_step
            .map_or(true, |accommodation| accommodation == filter.accommodation);
        if filter.combination_id == self.failing && step_fails {
            return Err(DirectoryError::Unavailable("connection reset".to_string()));
        }
        self.inner.query_schools(filter)
    }
}

pub(super) struct UnavailableDirectory;

impl SchoolDirectory for UnavailableDirectory {
    fn query_combinations(
        &self,
        _pathway: PathwayCode,
        _limit: usize,
    ) -> Result<Vec<SubjectCombination>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }

    fn query_schools(&self, _filter: &SchoolFilter) -> Result<Vec<School>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }
}

/// Records every school filter before delegating.
#[derive(Default)]
pub(super) struct RecordingDirectory {
    pub(super) inner: InMemorySchoolDirectory,
    pub(super) combination_queries: Mutex<usize>,
    pub(super) filters: Mutex<Vec<SchoolFilter>>,
}

impl RecordingDirectory {
    pub(super) fn filters(&self) -> Vec<SchoolFilter> {
        self.filters.lock().expect("filter mutex poisoned").clone()
    }
}

impl SchoolDirectory for RecordingDirectory {
    fn query_combinations(
        &self,
        pathway: PathwayCode,
        limit: usize,
    ) -> Result<Vec<SubjectCombination>, DirectoryError> {
        *self
            .combination_queries
            .lock()
            .expect("counter mutex poisoned") += 1;
        self.inner.query_combinations(pathway, limit)
    }

    fn query_schools(&self, filter: &SchoolFilter) -> Result<Vec<School>, DirectoryError> {
        self.filters
            .lock()
            .expect("filter mutex poisoned")
            .push(filter.clone());
        self.inner.query_schools(filter)
    }
}

pub(super) fn school_ids<'a>(schools: impl Iterator<Item = &'a School>) -> Vec<&'a str> {
    schools.map(|school| school.id.0.as_str()).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
