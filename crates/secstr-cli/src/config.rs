use crate::cli::AssignArgs;
use crate::error::{CliError, Result};
use secstr::engine::config::{AssignmentConfig, AssignmentConfigBuilder, HBondStrategy};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialHBondConfig {
    energy_cutoff: Option<f64>,
    strategy: Option<HBondStrategy>,
    recompute_amide_hydrogens: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSheetConfig {
    enabled: Option<bool>,
    min_bonds_per_ladder: Option<usize>,
    min_overlap_for_joining: Option<usize>,
    max_short_side_shift: Option<isize>,
    max_long_side_shift: Option<isize>,
    strands_by_alpha: Option<bool>,
    bulges_by_alpha: Option<bool>,
    allow_antiparallel33: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialHelixConfig {
    enabled: Option<bool>,
    min_bonds_per_helix: Option<usize>,
    helices_by_alpha: Option<bool>,
    merge_overlapping: Option<bool>,
}

/// The TOML configuration file. Every key is optional; absent keys fall back
/// to the library defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAssignmentConfig {
    hbonds: Option<PartialHBondConfig>,
    sheets: Option<PartialSheetConfig>,
    helices: Option<PartialHelixConfig>,
}

impl PartialAssignmentConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves every parameter as CLI argument, then config file, then default.
    pub fn merge_with_cli(self, args: &AssignArgs) -> Result<AssignmentConfig> {
        let defaults = AssignmentConfig::default();
        let hbonds = self.hbonds.unwrap_or_default();
        let sheets = self.sheets.unwrap_or_default();
        let helices = self.helices.unwrap_or_default();

        let detect_sheets = !args.no_sheets && sheets.enabled.unwrap_or(defaults.detect_sheets);
        let detect_helices =
            !args.no_helices && helices.enabled.unwrap_or(defaults.detect_helices);

        AssignmentConfigBuilder::new()
            .energy_cutoff(
                args.energy_cutoff
                    .or(hbonds.energy_cutoff)
                    .unwrap_or(defaults.hbonds.energy_cutoff),
            )
            .hbond_strategy(
                args.strategy
                    .or(hbonds.strategy)
                    .unwrap_or(defaults.hbonds.strategy),
            )
            .recompute_amide_hydrogens(
                hbonds
                    .recompute_amide_hydrogens
                    .unwrap_or(defaults.recompute_amide_hydrogens),
            )
            .detect_sheets(detect_sheets)
            .min_bonds_per_ladder(
                sheets
                    .min_bonds_per_ladder
                    .unwrap_or(defaults.sheets.min_bonds_per_ladder),
            )
            .min_overlap_for_joining(
                sheets
                    .min_overlap_for_joining
                    .unwrap_or(defaults.sheets.min_overlap_for_joining),
            )
            .max_short_side_shift(
                sheets
                    .max_short_side_shift
                    .unwrap_or(defaults.sheets.max_short_side_shift),
            )
            .max_long_side_shift(
                sheets
                    .max_long_side_shift
                    .unwrap_or(defaults.sheets.max_long_side_shift),
            )
            .strands_by_alpha(
                sheets
                    .strands_by_alpha
                    .unwrap_or(defaults.sheets.strands_by_alpha),
            )
            .bulges_by_alpha(
                sheets
                    .bulges_by_alpha
                    .unwrap_or(defaults.sheets.bulges_by_alpha),
            )
            .allow_antiparallel33(
                sheets
                    .allow_antiparallel33
                    .unwrap_or(defaults.sheets.allow_antiparallel33),
            )
            .detect_helices(detect_helices)
            .min_bonds_per_helix(
                helices
                    .min_bonds_per_helix
                    .unwrap_or(defaults.helices.min_bonds_per_helix),
            )
            .helices_by_alpha(
                helices
                    .helices_by_alpha
                    .unwrap_or(defaults.helices.helices_by_alpha),
            )
            .merge_overlapping_helices(
                helices
                    .merge_overlapping
                    .unwrap_or(defaults.helices.merge_overlapping),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}
