use crate::infra::{bundled_directory, load_directory, read_json_file};
use akili_pathways::config::{AppConfig, DirectoryConfig};
use akili_pathways::error::AppError;
use akili_pathways::workflows::assessment::Stanine;
use akili_pathways::workflows::placement::{
    calculate_safety_score, Gender, InMemorySchoolDirectory, PathwayCode, PathwayFitResult,
    PlacementConfig, PlacementEngine, RecommendationResponse, RecommendationSet, SchoolCluster,
    SelectionGrid, StudentProfile, COMBINATIONS_PER_PATHWAY, GRID_SIZE,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// JSON file holding the student profile
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// JSON file holding the pathway-fit result
    #[arg(long)]
    pub(crate) pathway_fit: PathBuf,
    /// Directory with combinations.csv, schools.csv and offerings.csv.
    /// Falls back to DIRECTORY_SEED_DIR, then to the bundled sample directory.
    #[arg(long)]
    pub(crate) seed_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Home county of the sample student
    #[arg(long, default_value = "Kisumu")]
    pub(crate) county: String,
    /// Home sub-county of the sample student
    #[arg(long, default_value = "Kisumu East")]
    pub(crate) sub_county: String,
    /// Assessment stanine (1-9)
    #[arg(long, default_value = "7", value_parser = parse_stanine)]
    pub(crate) stanine: Stanine,
    /// Primary pathway code (STEM, SOSC or ARTS)
    #[arg(long, default_value = "STEM", value_parser = parse_pathway)]
    pub(crate) pathway: PathwayCode,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        profile,
        pathway_fit,
        seed_dir,
    } = args;

    let config = AppConfig::load()?;
    let profile: StudentProfile = read_json_file(&profile)?;
    let fit: PathwayFitResult = read_json_file(&pathway_fit)?;

    let directory = match seed_dir.or(config.directory.seed_dir) {
        Some(dir) => load_directory(&DirectoryConfig { seed_dir: Some(dir) })?,
        None => bundled_directory()?,
    };

    let response = recommend(directory, config.placement, &profile, &fit)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let profile = demo_profile(&args);
    let fit = demo_fit(&profile, args.pathway);

    let directory = bundled_directory()?;
    println!("Akili Pathways placement demo");
    println!(
        "Student {} | {} / {} | stanine {} | primary pathway {}",
        profile.id,
        profile.home_county,
        profile.home_sub_county,
        profile.stanine,
        args.pathway.name()
    );
    println!(
        "Directory: {} schools, {} subject combinations (bundled sample)",
        directory.school_count(),
        directory.combination_count()
    );

    let engine = PlacementEngine::new(Arc::new(directory), PlacementConfig::default());
    let set = engine.recommend_schools(&profile, &fit)?;
    let grid = SelectionGrid::from_recommendations(&set);
    render_grid(&set, &grid);

    println!("\nSafety score reference for stanine {}", profile.stanine);
    for cluster in [
        SchoolCluster::C1,
        SchoolCluster::C2,
        SchoolCluster::C3,
        SchoolCluster::C4,
        SchoolCluster::Pr,
    ] {
        println!(
            "  - {}: {}",
            cluster.code(),
            calculate_safety_score(profile.stanine, &cluster)
        );
    }

    Ok(())
}

fn recommend(
    directory: InMemorySchoolDirectory,
    config: PlacementConfig,
    profile: &StudentProfile,
    fit: &PathwayFitResult,
) -> Result<RecommendationResponse, AppError> {
    let engine = PlacementEngine::new(Arc::new(directory), config);
    let set = engine.recommend_schools(profile, fit)?;
    let grid = SelectionGrid::from_recommendations(&set);
    Ok(RecommendationResponse {
        recommendations: set.recommendations,
        metadata: set.metadata,
        grid,
    })
}

fn demo_profile(args: &DemoArgs) -> StudentProfile {
    StudentProfile {
        id: "demo-student".to_string(),
        gender: Gender::Female,
        home_county: args.county.clone(),
        home_sub_county: args.sub_county.clone(),
        achievement_level: args.stanine.get(),
        stanine: args.stanine,
        sub_county_rank: Some(3),
    }
}

fn demo_fit(profile: &StudentProfile, primary: PathwayCode) -> PathwayFitResult {
    let score = |pathway: PathwayCode| if pathway == primary { 82.0 } else { 55.0 };
    let secondary = PathwayCode::ALL
        .into_iter()
        .find(|pathway| *pathway != primary)
        .unwrap_or(primary);
    PathwayFitResult {
        student_id: profile.id.clone(),
        stem_score: score(PathwayCode::Stem),
        sosc_score: score(PathwayCode::SocialScience),
        arts_score: score(PathwayCode::Arts),
        primary_pathway: primary,
        secondary_pathway: secondary,
        confidence: 0.7,
    }
}

fn render_grid(set: &RecommendationSet, grid: &SelectionGrid) {
    println!(
        "\n{} schools across {} combinations (strategy {})",
        set.metadata.total_schools, set.metadata.combinations_considered, set.metadata.strategy
    );

    for combination_index in 0..COMBINATIONS_PER_PATHWAY {
        let combination = set
            .for_combination(combination_index)
            .next()
            .map(|slot| slot.combination_id.to_string())
            .unwrap_or_else(|| "no combination".to_string());
        println!(
            "\nBlock {} ({combination}) {}/4 filled",
            combination_index + 1,
            grid.filled_for(combination_index)
        );
        for slot in grid
            .slots()
            .iter()
            .filter(|slot| slot.combination_index == combination_index)
        {
            match (&slot.school, slot.safety_score) {
                (Some(school), Some(score)) => println!(
                    "  [{:>2}] {:<32} {} ({}, {}) safety {}",
                    slot.slot_id + 1,
                    slot.selection_type.description(),
                    school.name,
                    school.county,
                    school.cluster.code(),
                    score
                ),
                (Some(school), None) => println!(
                    "  [{:>2}] {:<32} {}",
                    slot.slot_id + 1,
                    slot.selection_type.description(),
                    school.name
                ),
                (None, _) => println!(
                    "  [{:>2}] {:<32} (empty)",
                    slot.slot_id + 1,
                    slot.selection_type.description()
                ),
            }
        }
    }

    if grid.is_complete() {
        println!("\nSelection grid complete");
    } else {
        println!("\nSelection grid has {} open slots", GRID_SIZE - grid.filled());
    }
}

fn parse_stanine(value: &str) -> Result<Stanine, String> {
    let raw: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a stanine"))?;
    Stanine::new(raw).map_err(|err| err.to_string())
}

fn parse_pathway(value: &str) -> Result<PathwayCode, String> {
    PathwayCode::from_code(value).ok_or_else(|| format!("unknown pathway '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_args() -> DemoArgs {
        DemoArgs {
            county: "Kisumu".to_string(),
            sub_county: "Kisumu East".to_string(),
            stanine: Stanine::new(7).expect("valid stanine"),
            pathway: PathwayCode::Stem,
        }
    }

    #[test]
    fn cli_parsers_reject_out_of_range_input() {
        assert_eq!(parse_stanine("4").expect("valid"), Stanine::new(4).expect("valid"));
        assert!(parse_stanine("0").is_err());
        assert!(parse_stanine("high").is_err());
        assert_eq!(parse_pathway("sosc").expect("valid"), PathwayCode::SocialScience);
        assert!(parse_pathway("LAW").is_err());
    }

    #[test]
    fn bundled_demo_student_gets_a_populated_grid() {
        let args = sample_args();
        let profile = demo_profile(&args);
        let fit = demo_fit(&profile, args.pathway);
        let response = recommend(
            bundled_directory().expect("bundled seed parses"),
            PlacementConfig::default(),
            &profile,
            &fit,
        )
        .expect("recommendation builds");

        assert_eq!(response.metadata.pathway_code, PathwayCode::Stem);
        assert!(response.metadata.total_schools > 0);
        assert_eq!(response.grid.filled(), response.metadata.total_schools);
        assert!(response
            .recommendations
            .iter()
            .all(|slot| slot.combination_index < COMBINATIONS_PER_PATHWAY));
    }

    #[test]
    fn demo_fit_makes_requested_pathway_dominant() {
        let profile = demo_profile(&sample_args());
        for pathway in PathwayCode::ALL {
            let fit = demo_fit(&profile, pathway);
            assert!(fit.primary_is_dominant());
            assert_ne!(fit.secondary_pathway, pathway);
        }
    }
}
