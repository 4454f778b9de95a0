//! CLI argument definitions for `qpitrack`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use qpi_tracker::config::ConfigOverrides;
use qpi_tracker::core::models::SemesterType;
use qpi_tracker::logger::Level;

/// CLI log level argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum SemesterSubcommand {
    /// Add an empty semester.
    Add {
        /// Year level (1 for the first year)
        #[arg(long, value_name = "N")]
        year: u8,
        /// Term: first, second, or summer
        #[arg(long, value_name = "TERM")]
        term: SemesterType,
        /// Academic year label (e.g., 2024-2025)
        #[arg(long = "academic-year", value_name = "LABEL")]
        academic_year: String,
        /// Mark the semester as already completed
        #[arg(long)]
        completed: bool,
    },
    /// List semesters with their QPI.
    List,
    /// Mark a semester as completed.
    Complete {
        /// Semester id (or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Add an existing semester to the academic record.
    Attach {
        /// Semester id (or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Remove a semester and all of its grades.
    Remove {
        /// Semester id (or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum GradeSubcommand {
    /// Record a grade in a semester.
    Add {
        /// Owning semester id (or unique prefix)
        #[arg(long, value_name = "ID")]
        semester: String,
        /// Course code (e.g., "CS 21")
        #[arg(long, value_name = "CODE")]
        code: String,
        /// Course title
        #[arg(long, value_name = "TITLE")]
        title: String,
        /// Credit units
        #[arg(long, value_name = "UNITS")]
        units: f64,
        /// Numerical grade (0-100)
        #[arg(long, value_name = "SCORE")]
        grade: f64,
        /// Catalog course id (defaults to the course code)
        #[arg(long = "course-id", value_name = "ID")]
        course_id: Option<String>,
    },
    /// Change fields of a recorded grade.
    Update {
        /// Grade id (or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
        /// Move to another semester
        #[arg(long, value_name = "ID")]
        semester: Option<String>,
        /// New course code
        #[arg(long, value_name = "CODE")]
        code: Option<String>,
        /// New course title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
        /// New credit units
        #[arg(long, value_name = "UNITS")]
        units: Option<f64>,
        /// New numerical grade (0-100)
        #[arg(long, value_name = "SCORE")]
        grade: Option<f64>,
        /// New catalog course id
        #[arg(long = "course-id", value_name = "ID")]
        course_id: Option<String>,
    },
    /// Remove a grade.
    Remove {
        /// Grade id (or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
    },
    /// List grades, optionally for one semester.
    List {
        /// Semester id (or unique prefix)
        #[arg(long, value_name = "ID")]
        semester: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Initialize (or replace) the academic record.
    Init {
        /// Program length in years (defaults to config `total_years`)
        #[arg(long, value_name = "N")]
        years: Option<u8>,
        /// Exclude summer terms from the cumulative QPI
        #[arg(long = "no-summer")]
        no_summer: bool,
    },
    /// Manage semesters.
    Semester {
        #[command(subcommand)]
        subcommand: SemesterSubcommand,
    },
    /// Manage grades.
    Grade {
        #[command(subcommand)]
        subcommand: GradeSubcommand,
    },
    /// Show semester, yearly, and cumulative QPI.
    Summary,
    /// Generate a transcript report.
    Report {
        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,
        /// Output file path (optional; defaults to config `reports_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Delete all grades, semesters, and the academic record.
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "qpitrack",
    about = "Track grades, semesters, and QPI standing",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the grade data directory
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the reports output directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` fields leave the loaded configuration untouched.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: None,
            verbose: self.config_verbose,
            data_dir: self
                .data_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
