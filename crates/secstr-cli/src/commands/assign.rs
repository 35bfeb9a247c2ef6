use crate::cli::AssignArgs;
use crate::config::PartialAssignmentConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use secstr::{
    core::io::{backbone_csv::BackboneCsvFile, traits::BackboneFile},
    engine::progress::ProgressReporter,
    workflows::{self, assign::Assignment},
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: AssignArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialAssignmentConfig::from_file(path)?,
        None => PartialAssignmentConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    info!("Loading backbone from {:?}", &args.input);
    let residues =
        BackboneCsvFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Assigning secondary structure for {} residues...",
        residues.len()
    );
    let assignment = workflows::assign::run(&residues, &config, &reporter)?;

    if !assignment.diagnostics.is_empty() {
        warn!(
            "Assignment finished with {} warning(s).",
            assignment.diagnostics.len()
        );
    }

    write_assignment(&assignment, &args.output)?;
    println!(
        "✓ {} SSE(s) and {} hydrogen bond(s) written to: {}",
        assignment.sses.len(),
        assignment.hbonds.len(),
        args.output.display()
    );
    Ok(())
}

fn write_assignment(assignment: &Assignment, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, assignment).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    writer.flush()?;
    Ok(())
}
