use super::domain::SchoolCluster;
use crate::workflows::assessment::Stanine;

const UNCLASSIFIED_PENALTY: i16 = 10;

/// Admission-difficulty penalty subtracted from the placement probability.
pub fn cluster_difficulty(cluster: &SchoolCluster) -> i16 {
    match cluster {
        SchoolCluster::C1 => 40,
        SchoolCluster::C2 => 30,
        SchoolCluster::C3 => 20,
        SchoolCluster::C4 => 10,
        SchoolCluster::Pr => 5,
        SchoolCluster::Unclassified(_) => UNCLASSIFIED_PENALTY,
    }
}

/// Estimated placement probability (0–100) for a student at a school of the given cluster.
pub fn calculate_safety_score(stanine: Stanine, cluster: &SchoolCluster) -> u8 {
    let stanine_impact = (9 - i16::from(stanine.get())) * 10;
    let probability = 100 - (cluster_difficulty(cluster) + stanine_impact);
    probability.clamp(0, 100) as u8
}
