use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{DirectoryError, InMemorySchoolDirectory};
use crate::workflows::placement::domain::{
    Accommodation, CombinationId, GenderPolicy, PathwayCode, School, SchoolCategory,
    SchoolCluster, SchoolId, SubjectCombination,
};

const COMBINATIONS_FILE: &str = "combinations.csv";
const SCHOOLS_FILE: &str = "schools.csv";
const OFFERINGS_FILE: &str = "offerings.csv";

#[derive(Debug, Deserialize)]
struct CombinationRow {
    id: String,
    code: String,
    track_code: String,
    pathway_code: PathwayCode,
    subjects: String,
}

#[derive(Debug, Deserialize)]
struct SchoolRow {
    id: String,
    name: String,
    county: String,
    sub_county: String,
    accommodation: Accommodation,
    cluster: String,
    gender: GenderPolicy,
    category: SchoolCategory,
    capacity: u32,
}

#[derive(Debug, Deserialize)]
struct OfferingRow {
    school_id: String,
    combination_id: String,
}

/// Builds an [`InMemorySchoolDirectory`] from CSV exports of the directory tables.
pub struct DirectorySeed;

impl DirectorySeed {
    /// Load `combinations.csv`, `schools.csv`, and `offerings.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<InMemorySchoolDirectory, DirectoryError> {
        let open = |name: &str| {
            let path = dir.join(name);
            File::open(&path)
                .map_err(|err| DirectoryError::Seed(format!("{}: {err}", path.display())))
        };

        Self::from_readers(
            open(COMBINATIONS_FILE)?,
            open(SCHOOLS_FILE)?,
            open(OFFERINGS_FILE)?,
        )
    }

    pub fn from_readers<C, S, O>(
        combinations: C,
        schools: S,
        offerings: O,
    ) -> Result<InMemorySchoolDirectory, DirectoryError>
    where
        C: Read,
        S: Read,
        O: Read,
    {
        let mut directory = InMemorySchoolDirectory::new();

        for row in read_rows::<CombinationRow, _>(combinations, COMBINATIONS_FILE)? {
            directory.add_combination(SubjectCombination {
                id: CombinationId(row.id),
                code: row.code,
                subjects: split_subjects(&row.subjects),
                track_code: row.track_code,
                pathway_code: row.pathway_code,
            });
        }

        for row in read_rows::<SchoolRow, _>(schools, SCHOOLS_FILE)? {
            directory.add_school(School {
                id: SchoolId(row.id),
                name: row.name,
                county: row.county,
                sub_county: row.sub_county,
                accommodation: row.accommodation,
                cluster: SchoolCluster::from_code(&row.cluster),
                gender: row.gender,
                category: row.category,
                capacity: row.capacity,
            });
        }

        for row in read_rows::<OfferingRow, _>(offerings, OFFERINGS_FILE)? {
            directory.offer(&SchoolId(row.school_id), &CombinationId(row.combination_id))?;
        }

        tracing::debug!(
            schools = directory.school_count(),
            combinations = directory.combination_count(),
            "school directory seeded"
        );

        Ok(directory)
    }
}

fn read_rows<T, R>(reader: R, source: &str) -> Result<Vec<T>, DirectoryError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv_reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|err| DirectoryError::Seed(format!("{source}: {err}")))
}

fn split_subjects(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|subject| !subject.is_empty())
        .map(str::to_string)
        .collect()
}
