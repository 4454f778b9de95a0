//! Academic record commands: `init`, `summary`, and `reset`

use super::config::confirm;
use super::{open_store, short_id, Store};
use qpi_tracker::config::Config;
use qpi_tracker::core::models::RecordConfig;
use qpi_tracker::{error, info, warn};

/// Initialize (or replace) the academic record
///
/// Flags win over the `[record]` config section. Semesters that already
/// exist are attached so the cumulative QPI covers them.
pub fn init(years: Option<u8>, no_summer: bool, config: &Config) {
    if let Err(err) = run_init(years, no_summer, config) {
        error!("Init failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run_init(years: Option<u8>, no_summer: bool, config: &Config) -> Result<(), String> {
    let mut record_config = config.record_config();
    if let Some(years) = years {
        if years == 0 {
            return Err("✗ Program length must be at least one year".to_string());
        }
        record_config.total_years = years;
    }
    if no_summer {
        record_config.include_summer = false;
    }

    let mut store = open_store(config)?;
    if store.academic_record().is_some() {
        warn!("Replacing existing academic record");
    }
    store.initialize_academic_record(record_config);

    let existing: Vec<_> = store.semesters().iter().map(|s| s.id).collect();
    for id in &existing {
        store.attach_semester(*id).map_err(|e| format!("✗ {e}"))?;
    }

    let RecordConfig {
        total_years,
        include_summer,
    } = record_config;
    println!(
        "✓ Academic record initialized: {total_years} year(s), summer {}",
        if include_summer { "counted" } else { "excluded" }
    );
    if !existing.is_empty() {
        println!("  Attached {} existing semester(s)", existing.len());
    }
    info!("Academic record initialized with {} semester(s)", existing.len());
    Ok(())
}

/// Print semester, yearly, and cumulative QPI
pub fn summary(config: &Config) {
    match open_store(config) {
        Ok(store) => print_summary(&store),
        Err(err) => {
            error!("Summary failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn print_summary(store: &Store) {
    let Some(record) = store.academic_record() else {
        println!("No academic record yet. Run `qpitrack init` to create one.");
        return;
    };

    let mut semesters = store.record_semesters();
    semesters.sort_by_key(|s| (s.year_level, s.semester_type.ordinal()));

    println!("\n=== Academic Record ===\n");
    println!(
        "Program: {} year(s), summer {}",
        record.config.total_years,
        if record.config.include_summer { "counted" } else { "excluded" }
    );

    if semesters.is_empty() {
        println!("\nNo semesters in the record.");
    }

    let mut current_year = 0;
    for semester in &semesters {
        if semester.year_level != current_year {
            current_year = semester.year_level;
            let year_qpi = store
                .year_qpi(current_year)
                .map_or_else(|| "-".to_string(), |s| s.display_qpi());
            println!("\nYear {current_year} (QPI {year_qpi})");
        }
        let excluded = semester.is_summer() && !record.config.include_summer;
        println!(
            "  {}  {:<16} {:>5.1} units  QPI {}{}",
            short_id(&semester.id),
            semester.semester_type.to_string(),
            semester.total_units,
            store
                .semester_qpi(&semester.id)
                .map_or_else(|| "-".to_string(), |s| s.display_qpi()),
            if excluded { "  (not counted)" } else { "" }
        );
    }

    println!();
    match store.cumulative_qpi() {
        Some(cumulative) => println!(
            "Cumulative QPI: {} ({:.1} units, {:.2} quality points)",
            cumulative.display_qpi(),
            cumulative.total_units,
            cumulative.total_quality_points
        ),
        None => println!("Cumulative QPI: - (no units recorded)"),
    }
}

/// Delete all grade data after confirmation
pub fn reset(yes: bool, config: &Config) {
    if !yes && !confirm("Delete all grades, semesters, and the academic record?") {
        println!("✗ Reset cancelled");
        return;
    }

    if let Err(err) = run_reset(config) {
        error!("Reset failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run_reset(config: &Config) -> Result<(), String> {
    let mut store = open_store(config)?;
    store
        .reset_all()
        .map_err(|e| format!("✗ Failed to remove grade data: {e}"))?;
    info!("Grade data reset in {}", config.storage.data_dir);
    println!("✓ All grade data removed");
    Ok(())
}
