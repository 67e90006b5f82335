use serde::{Deserialize, Serialize};

use super::domain::StudentProfile;

const DEFAULT_QUOTA: u32 = 2;

/// Track families used by the ministry's automatic per-sub-county placement quotas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrackType {
    Stem,
    SocialScience,
    ArtsSports,
    Other(String),
}

impl TrackType {
    pub fn from_code(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "STEM" => TrackType::Stem,
            "SOCIAL_SCIENCE" => TrackType::SocialScience,
            "ARTS_SPORTS" => TrackType::ArtsSports,
            _ => TrackType::Other(value.trim().to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            TrackType::Stem => "STEM",
            TrackType::SocialScience => "SOCIAL_SCIENCE",
            TrackType::ArtsSports => "ARTS_SPORTS",
            TrackType::Other(code) => code,
        }
    }

    /// Top-N students per sub-county that the ministry places automatically.
    pub const fn quota_limit(&self) -> u32 {
        match self {
            TrackType::Stem => 6,
            TrackType::SocialScience => 3,
            TrackType::ArtsSports => 2,
            TrackType::Other(_) => DEFAULT_QUOTA,
        }
    }
}

impl From<String> for TrackType {
    fn from(value: String) -> Self {
        TrackType::from_code(&value)
    }
}

impl From<TrackType> for String {
    fn from(value: TrackType) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaChance {
    pub quota_limit: u32,
    pub is_high_probability: bool,
}

/// A missing sub-county rank never meets the quota.
pub fn quota_chance(profile: &StudentProfile, track: &TrackType) -> QuotaChance {
    let quota_limit = track.quota_limit();
    let is_high_probability = profile
        .sub_county_rank
        .map(|rank| rank <= quota_limit)
        .unwrap_or(false);

    QuotaChance {
        quota_limit,
        is_high_probability,
    }
}
