//! Semester command handler

use super::{open_store, resolve_semester, short_id};
use crate::args::SemesterSubcommand;
use qpi_tracker::config::Config;
use qpi_tracker::core::models::{NewSemester, SemesterUpdate};
use qpi_tracker::error;

/// Run a semester subcommand against the configured store
pub fn run(subcommand: SemesterSubcommand, config: &Config) {
    if let Err(err) = execute(subcommand, config) {
        error!("Semester command failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn execute(subcommand: SemesterSubcommand, config: &Config) -> Result<(), String> {
    let mut store = open_store(config)?;

    match subcommand {
        SemesterSubcommand::Add {
            year,
            term,
            academic_year,
            completed,
        } => {
            if year == 0 {
                return Err("✗ Year level starts at 1".to_string());
            }
            let mut data = NewSemester::new(year, term, academic_year);
            data.is_completed = completed;
            let semester = store.add_semester(data);
            println!(
                "✓ Added semester {} [{}]",
                semester.label(),
                short_id(&semester.id)
            );
            if store.academic_record().is_none() {
                println!("  No academic record yet; run `qpitrack init` to track cumulative QPI.");
            }
        }
        SemesterSubcommand::List => list(&store),
        SemesterSubcommand::Complete { id } => {
            let id = resolve_semester(&store, &id)?;
            let semester = store
                .update_semester(
                    id,
                    SemesterUpdate {
                        is_completed: Some(true),
                        ..SemesterUpdate::default()
                    },
                )
                .map_err(|e| format!("✗ {e}"))?;
            println!("✓ Marked {} as completed", semester.label());
        }
        SemesterSubcommand::Attach { id } => {
            let id = resolve_semester(&store, &id)?;
            store.attach_semester(id).map_err(|e| format!("✗ {e}"))?;
            println!("✓ Semester {} is part of the academic record", short_id(&id));
        }
        SemesterSubcommand::Remove { id } => {
            let id = resolve_semester(&store, &id)?;
            let removed = store.remove_semester(id).map_err(|e| format!("✗ {e}"))?;
            println!("✓ Removed {} and its grades", removed.label());
        }
    }

    Ok(())
}

fn list(store: &super::Store) {
    if store.semesters().is_empty() {
        println!("No semesters recorded.");
        return;
    }

    let mut semesters: Vec<_> = store.semesters().iter().collect();
    semesters.sort_by_key(|s| (s.year_level, s.semester_type.ordinal()));

    println!("\n=== Semesters ===\n");
    for semester in semesters {
        let member = store
            .academic_record()
            .is_some_and(|record| record.contains(&semester.id));
        let qpi = store
            .semester_qpi(&semester.id)
            .map_or_else(|| "-".to_string(), |s| s.display_qpi());
        println!(
            "{}  {:<42} {:>2} grade(s)  {:>5.1} units  QPI {qpi}{}{}",
            short_id(&semester.id),
            semester.label(),
            semester.grades.len(),
            semester.total_units,
            if semester.is_completed { "  [completed]" } else { "" },
            if member { "" } else { "  (not in record)" },
        );
    }
}
