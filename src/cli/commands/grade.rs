//! Grade command handler

use super::{open_store, resolve_grade, resolve_semester, short_id, Store};
use crate::args::GradeSubcommand;
use qpi_tracker::config::Config;
use qpi_tracker::core::models::{GradeRecord, GradeUpdate, NewGrade};
use qpi_tracker::{error, verbose};

/// Run a grade subcommand against the configured store
pub fn run(subcommand: GradeSubcommand, config: &Config) {
    if let Err(err) = execute(subcommand, config) {
        error!("Grade command failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn execute(subcommand: GradeSubcommand, config: &Config) -> Result<(), String> {
    let mut store = open_store(config)?;

    match subcommand {
        GradeSubcommand::Add {
            semester,
            code,
            title,
            units,
            grade,
            course_id,
        } => {
            let semester_id = resolve_semester(&store, &semester)?;
            let mut data = NewGrade::new(semester_id, code, title, units, grade);
            if let Some(course_id) = course_id {
                data = data.with_course_id(course_id);
            }
            let added = store.add_grade(data).map_err(|e| format!("✗ {e}"))?;
            println!(
                "✓ Recorded {} {} ({:.1} → {}, {:.1}) [{}]",
                added.course_code,
                added.course_title,
                added.numerical_grade,
                added.letter_grade,
                added.grade_point,
                short_id(&added.id)
            );
            print_semester_qpi(&store, &added);
        }
        GradeSubcommand::Update {
            id,
            semester,
            code,
            title,
            units,
            grade,
            course_id,
        } => {
            let id = resolve_grade(&store, &id)?;
            let semester_id = semester
                .map(|s| resolve_semester(&store, &s))
                .transpose()?;
            let patch = GradeUpdate {
                course_id,
                course_code: code,
                course_title: title,
                units,
                numerical_grade: grade,
                semester_id,
            };
            if patch.is_empty() {
                return Err("✗ Nothing to update; pass at least one field flag".to_string());
            }
            let updated = store
                .update_grade(id, patch)
                .map_err(|e| format!("✗ {e}"))?;
            println!(
                "✓ Updated {} ({:.1} → {})",
                updated.course_code, updated.numerical_grade, updated.letter_grade
            );
            print_semester_qpi(&store, &updated);
        }
        GradeSubcommand::Remove { id } => {
            let id = resolve_grade(&store, &id)?;
            let removed = store.remove_grade(id).map_err(|e| format!("✗ {e}"))?;
            println!("✓ Removed {} {}", removed.course_code, removed.course_title);
            print_semester_qpi(&store, &removed);
        }
        GradeSubcommand::List { semester } => match semester {
            Some(semester) => {
                let semester_id = resolve_semester(&store, &semester)?;
                print_table(store.grades_by_semester(&semester_id));
            }
            None => print_table(store.grades().iter()),
        },
    }

    Ok(())
}

fn print_semester_qpi(store: &Store, grade: &GradeRecord) {
    let Some(semester) = store.semester(&grade.semester_id) else {
        return;
    };
    let qpi = store
        .semester_qpi(&semester.id)
        .map_or_else(|| "-".to_string(), |s| s.display_qpi());
    println!("  {} QPI: {qpi}", semester.label());
    if let Some(cumulative) = store.cumulative_qpi() {
        verbose!(
            "  Cumulative: {} over {:.1} units",
            cumulative.display_qpi(),
            cumulative.total_units
        );
    }
}

fn print_table<'a, I>(grades: I)
where
    I: IntoIterator<Item = &'a GradeRecord>,
{
    let mut printed = 0usize;
    for grade in grades {
        if printed == 0 {
            println!(
                "{:<8}  {:<10} {:<32} {:>5}  {:>5}  {:<2}  {:>3}",
                "ID", "CODE", "TITLE", "UNITS", "GRADE", "LG", "GP"
            );
        }
        println!(
            "{:<8}  {:<10} {:<32} {:>5.1}  {:>5.1}  {:<2}  {:>3.1}",
            short_id(&grade.id),
            grade.course_code,
            truncate(&grade.course_title, 32),
            grade.units,
            grade.numerical_grade,
            grade.letter_grade,
            grade.grade_point
        );
        printed += 1;
    }
    if printed == 0 {
        println!("No grades recorded.");
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
