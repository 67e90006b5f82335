//! Psychometric scoring shared by the placement core.
//!
//! Mini-game sessions report a raw score against a maximum; the score is banded into a
//! stanine that later drives safety scoring during school placement.

mod stanine;

pub use stanine::{AssessmentError, DomainScore, Stanine};
