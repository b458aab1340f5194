//! Entity schema consistency checker.
//!
//! This binary loads an entity catalog document, validates it, and prints a
//! report of every structural defect found together with suggested fixes.
//! It never connects to a database.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use schemaguard_core::{
    Check, SchemaGuardError, SchemaValidator, Severity, ValidationConfig, ValidationResult,
    catalog::{catalog_schema_definition, load_catalog},
    init_logging,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "schemaguard")]
#[command(about = "Entity schema consistency checker")]
#[command(version)]
#[command(long_about = "
SchemaGuard - Offline schema consistency checks for entity catalogs

Reads a catalog of entity declarations and reports:
- Missing or unresolvable primary keys
- Foreign keys to unknown entities or non-key columns
- Type mismatches between related columns
- Unindexed foreign keys and duplicate indexes
- Risky on-delete policies
- Orphaned entities and reference cycles
- Relation declarations not backed by a foreign key

EXIT STATUS:
  0  no issue at or above the --fail-on level
  1  at least one such issue, or the catalog could not be loaded

EXAMPLES:
  schemaguard check app.catalog.json
  schemaguard check --format json --output report.json app.catalog.json
  schemaguard check --skip circular_dependencies --root app_settings app.catalog.json
  schemaguard schema > catalog.schema.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate an entity catalog
    Check(CheckArgs),
    /// Print the catalog document JSON Schema
    Schema,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Catalog document path
    #[arg(help = "Path to the entity catalog (.json)")]
    pub catalog: PathBuf,

    /// Validation config file
    #[arg(short, long, help = "JSON file with validation settings")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Minimum reported severity
    #[arg(long, value_enum, help = "Drop issues below this severity")]
    pub min_severity: Option<SeverityArg>,

    /// Checks to disable
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        help = "Comma-separated list of checks to skip"
    )]
    pub skip: Vec<CheckArg>,

    /// Additional root entities
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated list of root/reference entities"
    )]
    pub root: Vec<String>,

    /// Failure threshold
    #[arg(
        long,
        value_enum,
        default_value_t = FailOn::Critical,
        help = "Exit with status 1 when an issue at or above this severity exists"
    )]
    pub fail_on: FailOn,

    /// Output file path
    #[arg(short, long, help = "Write the report to a file instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Available report formats
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text report
    Text,
    /// JSON validation result
    Json,
}

/// Severity levels accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeverityArg {
    Info,
    Warning,
    Error,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}

/// Check families accepted by `--skip`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum CheckArg {
    PrimaryKeys,
    ForeignKeys,
    Relations,
    MissingIndexes,
    DuplicateIndexes,
    CascadeOperations,
    CircularDependencies,
    TypeCompatibility,
}

impl From<CheckArg> for Check {
    fn from(arg: CheckArg) -> Self {
        match arg {
            CheckArg::PrimaryKeys => Check::PrimaryKeys,
            CheckArg::ForeignKeys => Check::ForeignKeys,
            CheckArg::Relations => Check::Relations,
            CheckArg::MissingIndexes => Check::MissingIndexes,
            CheckArg::DuplicateIndexes => Check::DuplicateIndexes,
            CheckArg::CascadeOperations => Check::CascadeOperations,
            CheckArg::CircularDependencies => Check::CircularDependencies,
            CheckArg::TypeCompatibility => Check::TypeCompatibility,
        }
    }
}

/// Severity that makes `check` fail
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Critical,
    Error,
    Warning,
}

impl FailOn {
    fn threshold(self) -> Severity {
        match self {
            FailOn::Critical => Severity::Critical,
            FailOn::Error => Severity::Error,
            FailOn::Warning => Severity::Warning,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    match &cli.command {
        Command::Check(args) => {
            let result = check_catalog(args)?;
            if result.has_issues_at_or_above(args.fail_on.threshold()) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Schema => {
            let schema = catalog_schema_definition()?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

/// Loads, validates, and reports on a catalog
fn check_catalog(args: &CheckArgs) -> anyhow::Result<ValidationResult> {
    info!("Checking catalog {}", args.catalog.display());

    let config = build_config(args)?;
    debug!("Validation config: {:?}", config);

    let contents = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("Failed to read catalog {}", args.catalog.display()))?;
    let entities = load_catalog(&contents)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;
    info!("Loaded {} entities", entities.len());

    let result = SchemaValidator::try_new(config)?.validate(&entities);

    let summary = result.summary();
    if result.is_valid() {
        info!(
            "✓ Validation completed: {} issues ({} errors, {} warnings)",
            summary.total_issues, summary.errors, summary.warnings
        );
    } else {
        warn!(
            "Validation found {} critical issues out of {}",
            summary.critical, summary.total_issues
        );
    }

    let rendered = render(&result, args.format)?;
    write_output(&rendered, args.output.as_deref())?;

    Ok(result)
}

/// Builds the validation config from the optional file and CLI overrides
fn build_config(args: &CheckArgs) -> schemaguard_core::Result<ValidationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ValidationConfig::default(),
    };

    if let Some(min_severity) = args.min_severity {
        config = config.with_min_severity(min_severity.into());
    }
    for check in &args.skip {
        config = config.with_check((*check).into(), false);
    }
    for root in &args.root {
        config = config.with_root_entity(root.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Reads a validation config file
fn load_config(path: &Path) -> schemaguard_core::Result<ValidationConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        SchemaGuardError::io(format!("Failed to read config {}", path.display()), e)
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        SchemaGuardError::serialization(format!("Failed to parse config {}", path.display()), e)
    })
}

fn render(result: &ValidationResult, format: ReportFormat) -> schemaguard_core::Result<String> {
    match format {
        ReportFormat::Text => Ok(result.to_report()),
        ReportFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| SchemaGuardError::serialization("Failed to serialize result", e)),
    }
}

fn write_output(rendered: &str, output: Option<&Path>) -> schemaguard_core::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| {
                SchemaGuardError::io(format!("Failed to write report {}", path.display()), e)
            })?;
            info!("✓ Report saved to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn check_args(argv: &[&str]) -> CheckArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Check(args) => args,
            Command::Schema => panic!("expected check command"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_check_defaults() {
        let args = check_args(&["schemaguard", "check", "app.catalog.json"]);

        assert_eq!(args.catalog, PathBuf::from("app.catalog.json"));
        assert_eq!(args.format, ReportFormat::Text);
        assert_eq!(args.fail_on, FailOn::Critical);
        assert!(args.min_severity.is_none());
        assert!(args.skip.is_empty());
        assert!(args.output.is_none());
    }

    #[test]
    fn test_cli_overrides_reach_config() {
        let args = check_args(&[
            "schemaguard",
            "check",
            "--min-severity",
            "warning",
            "--skip",
            "circular_dependencies,missing_indexes",
            "--root",
            "app_settings,countries",
            "app.catalog.json",
        ]);

        let config = build_config(&args).unwrap();
        assert_eq!(config.min_severity, Severity::Warning);
        assert!(!config.is_enabled(Check::CircularDependencies));
        assert!(!config.is_enabled(Check::MissingIndexes));
        assert!(config.is_enabled(Check::PrimaryKeys));
        assert!(config.is_root_entity("app_settings"));
        assert!(config.is_root_entity("countries"));
    }

    #[test]
    fn test_cli_rejects_unknown_check() {
        assert!(
            Cli::try_parse_from(["schemaguard", "check", "--skip", "spelling", "a.json"]).is_err()
        );
    }

    #[test]
    fn test_cli_blank_root_is_rejected() {
        let args = check_args(&["schemaguard", "check", "--root", " ", "app.catalog.json"]);
        assert!(matches!(
            build_config(&args),
            Err(SchemaGuardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cli_argument_mappings() {
        assert_eq!(Severity::from(SeverityArg::Info), Severity::Info);
        assert_eq!(Severity::from(SeverityArg::Critical), Severity::Critical);
        assert_eq!(Check::from(CheckArg::TypeCompatibility), Check::TypeCompatibility);
        assert_eq!(FailOn::Warning.threshold(), Severity::Warning);
        assert_eq!(FailOn::Error.threshold(), Severity::Error);
    }

    #[test]
    fn test_cli_missing_config_file_is_io_error() {
        let args = check_args(&[
            "schemaguard",
            "check",
            "--config",
            "/nonexistent/schemaguard.json",
            "app.catalog.json",
        ]);
        assert!(matches!(
            build_config(&args),
            Err(SchemaGuardError::Io { .. })
        ));
    }

    #[test]
    fn test_cli_config_file_with_overrides() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"validate_relations": false, "min_severity": "error"}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = check_args(&[
            "schemaguard",
            "check",
            "--config",
            &path,
            "--min-severity",
            "critical",
            "app.catalog.json",
        ]);
        let config = build_config(&args).unwrap();

        assert!(!config.is_enabled(Check::Relations));
        assert!(config.is_enabled(Check::ForeignKeys));
        assert_eq!(config.min_severity, Severity::Critical);
    }

    #[test]
    fn test_cli_invalid_config_file_is_serialization_error() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_severity": "fatal"}}"#).unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(SchemaGuardError::Serialization { .. })
        ));
    }

    #[test]
    fn test_cli_output_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        write_output("report body", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "report body");
    }

    #[test]
    fn test_cli_json_output_renders_result() {
        let result = SchemaValidator::with_defaults().validate(&[]);
        let rendered = render(&result, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["is_valid"], serde_json::json!(true));

        let text = render(&result, ReportFormat::Text).unwrap();
        assert!(text.contains("Overall Status: VALID"));
    }
}
