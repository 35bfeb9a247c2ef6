use crate::core::models::sse::{TypeCombining, default_type_combining};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_ENERGY_CUTOFF: f64 = -0.5; // kcal/mol
pub const DEFAULT_MIN_BONDS_PER_LADDER: usize = 2;
pub const DEFAULT_MIN_BONDS_PER_HELIX: usize = 2;
pub const DEFAULT_MIN_OVERLAP_FOR_JOINING: usize = 0;
pub const DEFAULT_MAX_SHORT_SIDE_SHIFT: isize = 4; // in Z units
pub const DEFAULT_MAX_LONG_SIDE_SHIFT: isize = 13; // in Z units

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// How backbone hydrogen bonds are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HBondStrategy {
    /// Every residue pair is tested.
    Exhaustive,
    /// Only residues whose alpha carbons share a neighbouring grid cell are tested.
    #[default]
    Grid,
}

impl FromStr for HBondStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exhaustive" => Ok(HBondStrategy::Exhaustive),
            "grid" => Ok(HBondStrategy::Grid),
            other => Err(ConfigError::InvalidValue {
                parameter: "hbond_strategy",
                reason: format!("unknown strategy '{other}', expected 'exhaustive' or 'grid'"),
            }),
        }
    }
}

impl fmt::Display for HBondStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HBondStrategy::Exhaustive => f.write_str("exhaustive"),
            HBondStrategy::Grid => f.write_str("grid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HBondConfig {
    pub energy_cutoff: f64,
    pub strategy: HBondStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetConfig {
    pub min_bonds_per_ladder: usize,
    /// Minimal overlap (in residues) of two strands of one chain for them to be merged.
    pub min_overlap_for_joining: usize,
    pub max_short_side_shift: isize,
    pub max_long_side_shift: isize,
    pub strands_by_alpha: bool,
    pub bulges_by_alpha: bool,
    pub allow_antiparallel33: bool,
}

impl SheetConfig {
    /// The joining overlap expressed in Z units (three per residue).
    pub fn min_z_overlap(&self) -> isize {
        3 * self.min_overlap_for_joining as isize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelixConfig {
    pub min_bonds_per_helix: usize,
    pub helices_by_alpha: bool,
    /// Fuse overlapping or touching helices of one chain through the type-combining rule.
    pub merge_overlapping: bool,
}

#[derive(Debug, Clone)]
pub struct AssignmentConfig {
    pub hbonds: HBondConfig,
    pub sheets: SheetConfig,
    pub helices: HelixConfig,
    pub detect_sheets: bool,
    pub detect_helices: bool,
    pub recompute_amide_hydrogens: bool,
    pub type_combining: TypeCombining,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            hbonds: HBondConfig {
                energy_cutoff: DEFAULT_ENERGY_CUTOFF,
                strategy: HBondStrategy::default(),
            },
            sheets: SheetConfig {
                min_bonds_per_ladder: DEFAULT_MIN_BONDS_PER_LADDER,
                min_overlap_for_joining: DEFAULT_MIN_OVERLAP_FOR_JOINING,
                max_short_side_shift: DEFAULT_MAX_SHORT_SIDE_SHIFT,
                max_long_side_shift: DEFAULT_MAX_LONG_SIDE_SHIFT,
                strands_by_alpha: true,
                bulges_by_alpha: false,
                allow_antiparallel33: true,
            },
            helices: HelixConfig {
                min_bonds_per_helix: DEFAULT_MIN_BONDS_PER_HELIX,
                helices_by_alpha: true,
                merge_overlapping: false,
            },
            detect_sheets: true,
            detect_helices: true,
            recompute_amide_hydrogens: true,
            type_combining: default_type_combining,
        }
    }
}

#[derive(Default)]
pub struct AssignmentConfigBuilder {
    energy_cutoff: Option<f64>,
    hbond_strategy: Option<HBondStrategy>,
    min_bonds_per_ladder: Option<usize>,
    min_bonds_per_helix: Option<usize>,
    min_overlap_for_joining: Option<usize>,
    max_short_side_shift: Option<isize>,
    max_long_side_shift: Option<isize>,
    strands_by_alpha: Option<bool>,
    bulges_by_alpha: Option<bool>,
    helices_by_alpha: Option<bool>,
    merge_overlapping_helices: Option<bool>,
    allow_antiparallel33: Option<bool>,
    detect_sheets: Option<bool>,
    detect_helices: Option<bool>,
    recompute_amide_hydrogens: Option<bool>,
    type_combining: Option<TypeCombining>,
}

impl AssignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn energy_cutoff(mut self, cutoff: f64) -> Self {
        self.energy_cutoff = Some(cutoff);
        self
    }
    pub fn hbond_strategy(mut self, strategy: HBondStrategy) -> Self {
        self.hbond_strategy = Some(strategy);
        self
    }
    pub fn min_bonds_per_ladder(mut self, n: usize) -> Self {
        self.min_bonds_per_ladder = Some(n);
        self
    }
    pub fn min_bonds_per_helix(mut self, n: usize) -> Self {
        self.min_bonds_per_helix = Some(n);
        self
    }
    pub fn min_overlap_for_joining(mut self, residues: usize) -> Self {
        self.min_overlap_for_joining = Some(residues);
        self
    }
    pub fn max_short_side_shift(mut self, shift: isize) -> Self {
        self.max_short_side_shift = Some(shift);
        self
    }
    pub fn max_long_side_shift(mut self, shift: isize) -> Self {
        self.max_long_side_shift = Some(shift);
        self
    }
    pub fn strands_by_alpha(mut self, enabled: bool) -> Self {
        self.strands_by_alpha = Some(enabled);
        self
    }
    pub fn bulges_by_alpha(mut self, enabled: bool) -> Self {
        self.bulges_by_alpha = Some(enabled);
        self
    }
    pub fn helices_by_alpha(mut self, enabled: bool) -> Self {
        self.helices_by_alpha = Some(enabled);
        self
    }
    pub fn merge_overlapping_helices(mut self, enabled: bool) -> Self {
        self.merge_overlapping_helices = Some(enabled);
        self
    }
    pub fn allow_antiparallel33(mut self, enabled: bool) -> Self {
        self.allow_antiparallel33 = Some(enabled);
        self
    }
    pub fn detect_sheets(mut self, enabled: bool) -> Self {
        self.detect_sheets = Some(enabled);
        self
    }
    pub fn detect_helices(mut self, enabled: bool) -> Self {
        self.detect_helices = Some(enabled);
        self
    }
    pub fn recompute_amide_hydrogens(mut self, enabled: bool) -> Self {
        self.recompute_amide_hydrogens = Some(enabled);
        self
    }
    pub fn type_combining(mut self, rule: TypeCombining) -> Self {
        self.type_combining = Some(rule);
        self
    }

    pub fn build(self) -> Result<AssignmentConfig, ConfigError> {
        let defaults = AssignmentConfig::default();

        let energy_cutoff = self.energy_cutoff.unwrap_or(defaults.hbonds.energy_cutoff);
        if !energy_cutoff.is_finite() {
            return Err(ConfigError::InvalidValue {
                parameter: "energy_cutoff",
                reason: format!("must be a finite number, got {energy_cutoff}"),
            });
        }

        let min_bonds_per_ladder = self
            .min_bonds_per_ladder
            .unwrap_or(defaults.sheets.min_bonds_per_ladder);
        if min_bonds_per_ladder == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "min_bonds_per_ladder",
                reason: "must be at least 1".to_string(),
            });
        }

        let min_bonds_per_helix = self
            .min_bonds_per_helix
            .unwrap_or(defaults.helices.min_bonds_per_helix);
        if min_bonds_per_helix == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "min_bonds_per_helix",
                reason: "must be at least 1".to_string(),
            });
        }

        let max_short_side_shift = self
            .max_short_side_shift
            .unwrap_or(defaults.sheets.max_short_side_shift);
        let max_long_side_shift = self
            .max_long_side_shift
            .unwrap_or(defaults.sheets.max_long_side_shift);
        if max_short_side_shift < 0 || max_long_side_shift < 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "max_side_shift",
                reason: format!(
                    "bulge shift bounds must not be negative, got {max_short_side_shift} and {max_long_side_shift}"
                ),
            });
        }

        Ok(AssignmentConfig {
            hbonds: HBondConfig {
                energy_cutoff,
                strategy: self.hbond_strategy.unwrap_or(defaults.hbonds.strategy),
            },
            sheets: SheetConfig {
                min_bonds_per_ladder,
                min_overlap_for_joining: self
                    .min_overlap_for_joining
                    .unwrap_or(defaults.sheets.min_overlap_for_joining),
                max_short_side_shift,
                max_long_side_shift,
                strands_by_alpha: self
                    .strands_by_alpha
                    .unwrap_or(defaults.sheets.strands_by_alpha),
                bulges_by_alpha: self
                    .bulges_by_alpha
                    .unwrap_or(defaults.sheets.bulges_by_alpha),
                allow_antiparallel33: self
                    .allow_antiparallel33
                    .unwrap_or(defaults.sheets.allow_antiparallel33),
            },
            helices: HelixConfig {
                min_bonds_per_helix,
                helices_by_alpha: self
                    .helices_by_alpha
                    .unwrap_or(defaults.helices.helices_by_alpha),
                merge_overlapping: self
                    .merge_overlapping_helices
                    .unwrap_or(defaults.helices.merge_overlapping),
            },
            detect_sheets: self.detect_sheets.unwrap_or(defaults.detect_sheets),
            detect_helices: self.detect_helices.unwrap_or(defaults.detect_helices),
            recompute_amide_hydrogens: self
                .recompute_amide_hydrogens
                .unwrap_or(defaults.recompute_amide_hydrogens),
            type_combining: self.type_combining.unwrap_or(defaults.type_combining),
        })
    }
}
