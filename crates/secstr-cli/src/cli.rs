use clap::{Args, Parser, Subcommand};
use secstr::engine::config::HBondStrategy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "secstr - hydrogen-bond based secondary-structure assignment for protein backbones.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assign helices, beta-sheets, bulges and turns from backbone coordinates.
    Assign(AssignArgs),
}

/// Arguments for the `assign` subcommand.
#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Path to the backbone coordinate table (CSV: chain,seq,name,atom,x,y,z).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the JSON assignment.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the hydrogen bond search strategy (grid or exhaustive).
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<HBondStrategy>,

    /// Override the hydrogen bond energy cutoff, in kcal/mol.
    #[arg(short, long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub energy_cutoff: Option<f64>,

    /// Skip helix detection, even if it is enabled in the config file.
    #[arg(long)]
    pub no_helices: bool,

    /// Skip ladder, sheet, bulge and turn detection, even if enabled in the config file.
    #[arg(long)]
    pub no_sheets: bool,
}
