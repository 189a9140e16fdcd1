use std::path::{Path, PathBuf};

use clap::Subcommand;
use classboard_core::{GradeProjector, ScoreSheet};

use super::load_config;

#[derive(Subcommand)]
pub enum GradesAction {
    /// List subjects, credit hours and assessment weights
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Project grades and CGPA from the scores entered so far.
    ///
    /// Each score is OBTAINED/TOTAL, e.g. 8/10. Blank or malformed scores
    /// (plain numbers, words, a zero or negative total, a negative obtained
    /// mark) are treated as "not attempted" and left out of the projection
    /// rather than reported as errors. Marks above the total (12/10) count
    /// as bonus and are not capped. Subjects with no scores count as 0.0
    /// toward the CGPA.
    Project {
        /// A score such as "Applied Physics:Final=40/50" (repeatable)
        #[arg(long = "score", value_name = "SUBJECT:COMPONENT=OBTAINED/TOTAL")]
        scores: Vec<String>,
        /// TOML score sheet: one table per subject, component = "obtained/total"
        #[arg(long)]
        sheet: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(
    action: GradesAction,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let catalog = config.catalog()?;

    match action {
        GradesAction::Catalog { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.subjects())?);
            } else {
                for subject in catalog.subjects() {
                    println!("{} ({} cr)", subject.name, subject.credit_hours);
                    for component in &subject.components {
                        println!("  {:<14} {:>5.1}%", component.name, component.weight_pct);
                    }
                }
            }
        }
        GradesAction::Project {
            scores,
            sheet,
            json,
        } => {
            let mut score_sheet = match sheet {
                Some(path) => ScoreSheet::load(&path)?,
                None => ScoreSheet::new(),
            };
            for assignment in &scores {
                score_sheet.insert_assignment(assignment)?;
            }

            let projector = GradeProjector::new(config.grading.scale.clone());
            let report = projector.report(&catalog, &score_sheet)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{:<34} {:>3} {:>9} {:>6}  {}",
                    "Subject", "Cr", "Projected", "GP", "Grade"
                );
                for result in &report.subjects {
                    println!(
                        "{:<34} {:>3} {:>8.2}% {:>6.2}  {}",
                        result.subject,
                        result.credit_hours,
                        result.projected_pct,
                        result.grade_point,
                        result.letter
                    );
                }
                println!();
                println!(
                    "CGPA: {:.2} over {} credit hours",
                    report.cgpa, report.total_credit_hours
                );
            }
        }
    }
    Ok(())
}
