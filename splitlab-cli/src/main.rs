//! SplitLab CLI — deterministic A/B/N assignment from the command line.
//!
//! Commands:
//! - `group` — assign a single identifier and print its group
//! - `assign` — bulk-assign a CSV table, appending a group column
//! - `report` — tally an already-assigned table into a distribution report
//!
//! Experiment identity (salt, groups, weights) comes either from flags or
//! from a TOML config file; mixing both for the same run is rejected.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use splitlab_core::{GroupSpec, Splitter};
use splitlab_runner::{
    assign_table, report_csv_column, AssignOptions, DistributionReport, ExperimentConfig,
    DEFAULT_GROUP_COLUMN,
};

#[derive(Parser)]
#[command(
    name = "splitlab",
    about = "SplitLab CLI — deterministic hash-based experiment assignment"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that needs an experiment identity.
#[derive(clap::Args)]
struct ExperimentArgs {
    /// Experiment salt. Required unless --config is given.
    #[arg(long)]
    salt: Option<String>,

    /// Comma-separated group names (e.g. control,variant_a,variant_b).
    #[arg(long, value_delimiter = ',')]
    groups: Option<Vec<String>>,

    /// Comma-separated weights matching --groups (e.g. 0.5,0.25,0.25).
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,

    /// TOML experiment config file (salt, groups, weights).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign a single identifier and print its group name.
    Group {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Identifier to assign.
        #[arg(long)]
        id: String,
    },
    /// Bulk-assign a CSV table, appending a group column.
    Assign {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Input CSV file.
        #[arg(long)]
        input: PathBuf,

        /// Column holding each record's identifier.
        #[arg(long)]
        id_column: String,

        /// Output CSV file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Name of the appended column.
        #[arg(long, default_value = DEFAULT_GROUP_COLUMN)]
        group_column: String,

        /// Print a distribution report to stderr after assigning.
        #[arg(long, default_value_t = false)]
        report: bool,
    },
    /// Tally an assignment column of an existing CSV table.
    Report {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Assigned CSV file.
        #[arg(long)]
        input: PathBuf,

        /// Column holding the group labels.
        #[arg(long, default_value = DEFAULT_GROUP_COLUMN)]
        group_column: String,

        /// Emit the report as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Group { experiment, id } => run_group(&experiment, &id),
        Commands::Assign {
            experiment,
            input,
            id_column,
            output,
            group_column,
            report,
        } => run_assign(&experiment, &input, &id_column, output, &group_column, report),
        Commands::Report {
            experiment,
            input,
            group_column,
            json,
        } => run_report(&experiment, &input, &group_column, json),
    }
}

/// Load the TOML config if given, rejecting mixed flag/config identity.
fn load_config(args: &ExperimentArgs) -> Result<Option<ExperimentConfig>> {
    let Some(path) = &args.config else {
        return Ok(None);
    };
    if args.salt.is_some() || args.groups.is_some() || args.weights.is_some() {
        bail!("--config cannot be combined with --salt/--groups/--weights");
    }
    let config = ExperimentConfig::load(path)
        .with_context(|| format!("loading experiment config {}", path.display()))?;
    Ok(Some(config))
}

fn spec_from_flags(args: &ExperimentArgs) -> Result<GroupSpec> {
    Ok(match (&args.groups, &args.weights) {
        (None, None) => GroupSpec::control_test(),
        (Some(groups), None) => GroupSpec::even(groups.clone())?,
        (Some(groups), Some(weights)) => GroupSpec::new(groups.clone(), weights.clone())?,
        (None, Some(_)) => bail!("--weights requires --groups"),
    })
}

/// Resolve flags/config into a splitter and a validated group spec.
fn resolve_experiment(args: &ExperimentArgs) -> Result<(Splitter, GroupSpec)> {
    if let Some(config) = load_config(args)? {
        let spec = config.group_spec()?;
        return Ok((config.splitter(), spec));
    }
    let Some(salt) = &args.salt else {
        bail!("either --salt or --config is required");
    };
    Ok((Splitter::new(salt.clone()), spec_from_flags(args)?))
}

/// Like [`resolve_experiment`] but without requiring a salt — tallying an
/// existing assignment column only needs the group spec.
fn resolve_spec(args: &ExperimentArgs) -> Result<GroupSpec> {
    if let Some(config) = load_config(args)? {
        return Ok(config.group_spec()?);
    }
    spec_from_flags(args)
}

fn run_group(experiment: &ExperimentArgs, id: &str) -> Result<()> {
    let (splitter, spec) = resolve_experiment(experiment)?;
    println!("{}", splitter.group(id, &spec));
    Ok(())
}

fn run_assign(
    experiment: &ExperimentArgs,
    input: &Path,
    id_column: &str,
    output: Option<PathBuf>,
    group_column: &str,
    report: bool,
) -> Result<()> {
    let (splitter, spec) = resolve_experiment(experiment)?;
    let opts = AssignOptions::new(id_column).with_group_column(group_column);

    let reader =
        File::open(input).with_context(|| format!("opening input {}", input.display()))?;

    let summary = match &output {
        Some(path) => {
            let writer = File::create(path)
                .with_context(|| format!("creating output {}", path.display()))?;
            assign_table(reader, writer, &splitter, &spec, &opts)?
        }
        None => {
            let stdout = io::stdout();
            assign_table(reader, stdout.lock(), &splitter, &spec, &opts)?
        }
    };

    if report {
        let dist = DistributionReport::from_summary(&summary, &spec)?;
        eprintln!("{}", dist.render());
    }
    Ok(())
}

fn run_report(
    experiment: &ExperimentArgs,
    input: &Path,
    group_column: &str,
    json: bool,
) -> Result<()> {
    let spec = resolve_spec(experiment)?;
    let reader =
        File::open(input).with_context(|| format!("opening input {}", input.display()))?;
    let dist = report_csv_column(reader, group_column, &spec)?;

    let mut stdout = io::stdout();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &dist)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", dist.render())?;
    }
    Ok(())
}
