//! cmsmig - run a CMS export migration from the command line.
//!
//! Reads a legacy export (JSON), resolves a migration plan and writes every
//! migrated entity as a JSON file under the output directory.

mod formatter;
mod writer;

use clap::Parser;
use cmsmig_core::{
    DefaultProfile, LegacyExport, MigrationError, MigrationOptions, MigrationPipeline,
    MigrationPlan, MigrationProfile, MigratorRegistry, PipelineConfig, WriterError,
};
use formatter::ReportFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use writer::JsonDirectoryWriter;

/// cmsmig - CMS export migration runner
#[derive(Parser, Debug)]
#[command(name = "cmsmig")]
#[command(version, about = "Migrate a legacy CMS export")]
pub struct Args {
    /// Legacy export to migrate (JSON)
    #[arg(short, long, required_unless_present = "init_plan")]
    pub source: Option<PathBuf>,

    /// Migration options document (JSON). Defaults to migrating everything.
    #[arg(short, long)]
    pub plan: Option<PathBuf>,

    /// Output directory. Defaults to the plan's target.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Data type conversion threads (0 = auto)
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Fail when an editor has no migrator
    #[arg(long)]
    pub fail_on_unmapped: bool,

    /// Copy pre-values of editors without a migrator instead of skipping them
    #[arg(long, conflicts_with = "fail_on_unmapped")]
    pub passthrough: bool,

    /// Report format
    #[arg(long, default_value = "table", value_enum)]
    pub format: ReportFormat,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write the default options document to this path and exit
    #[arg(long, value_name = "PATH")]
    pub init_plan: Option<PathBuf>,
}

impl Args {
    /// Pipeline configuration from the command line.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let config = PipelineConfig::new().with_fail_on_unmapped(self.fail_on_unmapped);
        if self.workers > 0 {
            config.with_conversion_workers(self.workers)
        } else {
            config
        }
    }

    pub fn registry(&self) -> MigratorRegistry {
        let registry = MigratorRegistry::with_defaults();
        if self.passthrough {
            registry.with_passthrough_fallback()
        } else {
            registry
        }
    }
}

/// Errors surfaced by the command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Writer(#[from] WriterError),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cmsmig=info,cmsmig_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &args.init_plan {
        let options = DefaultProfile.options();
        std::fs::write(path, options.to_json_pretty()?)?;
        tracing::info!(path = %path.display(), profile = DefaultProfile.name(), "wrote plan");
        return Ok(());
    }

    let Some(source) = &args.source else {
        return Err("--source is required".into());
    };

    let options = match &args.plan {
        Some(path) => load_options(path)?,
        None => DefaultProfile.options(),
    };
    let plan = MigrationPlan::resolve(&options)?;
    let export = load_export(source)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(plan.target()));
    tracing::info!(
        source = %source.display(),
        output = %output.display(),
        entities = export.len(),
        "starting migration"
    );

    let pipeline = MigrationPipeline::new(Arc::new(args.registry()), args.pipeline_config());
    let mut writer = JsonDirectoryWriter::create(&output).map_err(CliError::from)?;
    let report = pipeline.run(&plan, &export, &mut writer).map_err(CliError::from)?;

    if let Some(path) = &args.report {
        std::fs::write(path, formatter::format_report(&report, ReportFormat::Json)?)?;
    }
    println!("{}", formatter::format_report(&report, args.format)?);
    tracing::info!(written = writer.written(), "migration written");

    Ok(())
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_options(path: &Path) -> Result<MigrationOptions, CliError> {
    let json = read(path)?;
    match MigrationOptions::from_json(&json) {
        Ok(options) => Ok(options),
        Err(MigrationError::Serialization(source)) => Err(CliError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(other) => Err(other.into()),
    }
}

fn load_export(path: &Path) -> Result<LegacyExport, CliError> {
    let json = read(path)?;
    serde_json::from_str(&json).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsmig_core::EntityType;
    use std::ffi::OsString;

    #[test]
    fn test_args_build_config() {
        let args = Args::parse_from(["cmsmig", "--source", "export.json", "--workers", "3", "--passthrough"]);
        assert_eq!(args.pipeline_config().conversion_workers, 3);
        assert!(args.registry().has_fallback());
        assert_eq!(args.format, ReportFormat::Table);
    }

    #[test]
    fn test_source_required_without_init_plan() {
        assert!(Args::try_parse_from(["cmsmig"]).is_err());
        assert!(Args::try_parse_from(["cmsmig", "--init-plan", "plan.json"]).is_ok());
        assert!(Args::try_parse_from(["cmsmig", "-s", "x.json", "--passthrough", "--fail-on-unmapped"]).is_err());
    }

    #[test]
    fn test_end_to_end_run() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("export.json");
        let plan = dir.path().join("plan.json");
        let output = dir.path().join("out");

        std::fs::write(
            &source,
            r#"{
                "dataTypes": [
                    {"key": "00000000-0000-0000-0000-000000000001", "alias": "Notes",
                     "editorAlias": "Umbraco.TextboxMultiple",
                     "preValues": [{"alias": "rows", "value": "4"}]}
                ],
                "templates": [
                    {"key": "00000000-0000-0000-0000-000000000002", "alias": "Master"}
                ]
            }"#,
        )
        .unwrap();
        std::fs::write(
            &plan,
            MigrationOptions::new("unused")
                .with_handlers(|entity_type| entity_type == EntityType::DataType)
                .to_json_pretty()
                .unwrap(),
        )
        .unwrap();

        let args = Args::parse_from([
            OsString::from("cmsmig"),
            OsString::from("--source"),
            source.clone().into_os_string(),
            OsString::from("--plan"),
            plan.clone().into_os_string(),
            OsString::from("--output"),
            output.clone().into_os_string(),
        ]);
        run(args).unwrap();

        let data_type: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(
                output
                    .join("data-types")
                    .join("00000000-0000-0000-0000-000000000001.json"),
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(data_type["editorAlias"], "Umbraco.TextArea");
        assert_eq!(data_type["config"]["rows"], 4);
        assert!(!output.join("templates").exists());
        assert!(output.join("index.json").exists());
    }

    #[test]
    fn test_bad_plan_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let plan = dir.path().join("plan.json");
        std::fs::write(&plan, "{ not json").unwrap();

        let err = load_options(&plan).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
        assert!(err.to_string().contains("plan.json"));
    }
}
