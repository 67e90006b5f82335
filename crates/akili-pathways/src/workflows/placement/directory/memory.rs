use std::collections::{HashMap, HashSet};

use super::{DirectoryError, SchoolDirectory, SchoolFilter};
use crate::workflows::placement::domain::{
    CombinationId, PathwayCode, School, SchoolId, SubjectCombination,
};

/// Directory held entirely in memory. Rows come back in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemorySchoolDirectory {
    combinations: Vec<SubjectCombination>,
    schools: Vec<School>,
    offerings: HashMap<CombinationId, HashSet<SchoolId>>,
}

impl InMemorySchoolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a combination. A combination with the same id is replaced in place.
    pub fn add_combination(&mut self, combination: SubjectCombination) {
        match self
            .combinations
            .iter_mut()
            .find(|existing| existing.id == combination.id)
        {
            Some(existing) => *existing = combination,
            None => self.combinations.push(combination),
        }
    }

    /// Register a school. A school with the same id is replaced in place.
    pub fn add_school(&mut self, school: School) {
        match self
            .schools
            .iter_mut()
            .find(|existing| existing.id == school.id)
        {
            Some(existing) => *existing = school,
            None => self.schools.push(school),
        }
    }

    /// Record that `school` teaches `combination`. Both must already be registered.
    pub fn offer(
        &mut self,
        school: &SchoolId,
        combination: &CombinationId,
    ) -> Result<(), DirectoryError> {
        if !self.schools.iter().any(|existing| &existing.id == school) {
            return Err(DirectoryError::Seed(format!("unknown school '{}'", school.0)));
        }
        if !self
            .combinations
            .iter()
            .any(|existing| &existing.id == combination)
        {
            return Err(DirectoryError::Seed(format!(
                "unknown combination '{combination}'"
            )));
        }

        self.offerings
            .entry(combination.clone())
            .or_default()
            .insert(school.clone());
        Ok(())
    }

    pub fn school_count(&self) -> usize {
        self.schools.len()
    }

    pub fn combination_count(&self) -> usize {
        self.combinations.len()
    }
}

impl SchoolDirectory for InMemorySchoolDirectory {
    fn query_combinations(
        &self,
        pathway: PathwayCode,
        limit: usize,
    ) -> Result<Vec<SubjectCombination>, DirectoryError> {
        Ok(self
            .combinations
            .iter()
            .filter(|combination| combination.pathway_code == pathway)
            .take(limit)
            .cloned()
            .collect())
    }

    fn query_schools(&self, filter: &SchoolFilter) -> Result<Vec<School>, DirectoryError> {
        filter.validate()?;

        let Some(offered) = self.offerings.get(&filter.combination_id) else {
            return Ok(Vec::new());
        };

        Ok(self
            .schools
            .iter()
            .filter(|school| offered.contains(&school.id))
            .filter(|school| filter.matches(school))
            .take(filter.limit)
            .cloned()
            .collect())
    }
}
