use std::fmt;

use serde::{Deserialize, Serialize};

/// Standardized 1–9 psychometric bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stanine(u8);

impl Stanine {
    pub const MIN: Stanine = Stanine(1);
    pub const MAX: Stanine = Stanine(9);

    pub fn new(value: u8) -> Result<Self, AssessmentError> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AssessmentError::StanineOutOfRange(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Band a 0–100 percentage. Values above 100 land in the top band.
    pub fn from_percentage(percentage: u8) -> Self {
        let band = match percentage {
            0..=9 => 1,
            10..=19 => 2,
            20..=39 => 3,
            40..=49 => 4,
            50..=69 => 5,
            70..=79 => 6,
            80..=89 => 7,
            90..=94 => 8,
            _ => 9,
        };
        Self(band)
    }

    /// Every valid stanine from 1 through 9.
    pub fn all() -> impl Iterator<Item = Stanine> {
        (1..=9).map(Stanine)
    }
}

impl TryFrom<u8> for Stanine {
    type Error = AssessmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stanine> for u8 {
    fn from(value: Stanine) -> Self {
        value.0
    }
}

impl fmt::Display for Stanine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scaled result of a completed assessment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainScore {
    pub raw_score: u32,
    pub scaled_score: u8,
    pub stanine: Stanine,
    pub percentile_rank: u8,
}

impl DomainScore {
    pub fn from_raw(raw_score: u32, max_score: u32) -> Result<Self, AssessmentError> {
        if max_score == 0 {
            return Err(AssessmentError::ZeroMaxScore);
        }
        if raw_score > max_score {
            return Err(AssessmentError::RawScoreExceedsMax {
                raw: raw_score,
                max: max_score,
            });
        }

        let percentage = (f64::from(raw_score) / f64::from(max_score) * 100.0).round() as u8;

        Ok(Self {
            raw_score,
            scaled_score: percentage,
            stanine: Stanine::from_percentage(percentage),
            percentile_rank: percentage,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("stanine must be between 1 and 9 (got {0})")]
    StanineOutOfRange(u8),
    #[error("maximum score must be positive")]
    ZeroMaxScore,
    #[error("raw score {raw} exceeds maximum {max}")]
    RawScoreExceedsMax { raw: u32, max: u32 },
}
