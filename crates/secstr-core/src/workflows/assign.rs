use crate::core::models::residue::Residue;
use crate::core::models::sse::Sse;
use crate::core::utils::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::core::utils::geometry::dssp_amide_hydrogen;
use crate::engine::bulge::BulgeClassifier;
use crate::engine::config::AssignmentConfig;
use crate::engine::error::AssignError;
use crate::engine::hbonds::{BackboneIndex, BondIndex, HBondOracle};
use crate::engine::helix::{self, HelixDetector};
use crate::engine::ladder::{LadderSearch, invalid_ladder};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sheet::{SheetGraph, StrandId};
use crate::engine::turns::c7_turns_and_wiggles;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// A sheet edge between two output strands: `(lower index, higher index, +1 / -1)`,
/// `+1` for a parallel ladder and `-1` for an antiparallel one.
pub type StrandLink = (usize, usize, i8);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidueRef {
    pub chain_id: String,
    pub seq_number: isize,
    pub name: String,
}

impl From<&Residue> for ResidueRef {
    fn from(residue: &Residue) -> Self {
        Self {
            chain_id: residue.chain_id.clone(),
            seq_number: residue.seq_number,
            name: residue.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HBondRecord {
    pub donor: ResidueRef,
    pub acceptor: ResidueRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    /// Turns, strands and helices ordered by chain, start and end.
    pub sses: Vec<Sse>,
    /// Sheet edges indexing into `sses`.
    pub connectivity: Vec<StrandLink>,
    pub hbonds: Vec<HBondRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[instrument(skip_all, name = "assignment_workflow")]
pub fn run(
    residues: &[Residue],
    config: &AssignmentConfig,
    reporter: &ProgressReporter,
) -> Result<Assignment, AssignError> {
    let mut diagnostics = Diagnostics::new();

    // === Phase 0: Backbone preparation ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(residues = residues.len(), "Preparing backbone.");
    let prepared: Cow<'_, [Residue]> = if config.recompute_amide_hydrogens {
        Cow::Owned(place_amide_hydrogens(residues, &mut diagnostics)?)
    } else {
        Cow::Borrowed(residues)
    };
    let backbone = BackboneIndex::new(&prepared)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Hydrogen bond detection ===
    let oracle = HBondOracle::new(&backbone, &config.hbonds);
    let bonds = reporter.phase("Hydrogen Bonds", || BondIndex::build(&oracle));
    info!(
        strategy = %oracle.strategy(),
        bonds = bonds.len(),
        "Hydrogen bond detection finished."
    );
    reporter.report(Progress::Message(format!(
        "{} hydrogen bonds found",
        bonds.len()
    )));

    // === Phases 2-4: Secondary structure elements ===
    let (sses, connectivity) =
        assign_from_bonds(&backbone, &bonds, config, reporter, &mut diagnostics)?;

    // === Phase 5: Organize and return results ===
    let hbonds = bonds
        .iter()
        .map(|b| HBondRecord {
            donor: backbone.residue(b.donor).into(),
            acceptor: backbone.residue(b.acceptor).into(),
        })
        .collect();

    info!(
        "Workflow complete. Assigned {} SSE(s) with {} warning(s).",
        sses.len(),
        diagnostics.len()
    );
    Ok(Assignment {
        sses,
        connectivity,
        hbonds,
        diagnostics: diagnostics.into_entries(),
    })
}

/// Discards every amide hydrogen and places a new one on each non-proline
/// residue that directly follows another residue of its chain.
fn place_amide_hydrogens(
    residues: &[Residue],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Residue>, AssignError> {
    let mut placed = residues.to_vec();
    for (i, residue) in placed.iter_mut().enumerate() {
        residue.atoms.h = None;
        let Some(prev) = i.checked_sub(1).map(|p| &residues[p]) else {
            continue;
        };
        if residue.is_proline() || !prev.is_followed_by(residue) {
            continue;
        }
        let (Some(n), Some(c), Some(o)) = (residue.atoms.n, prev.atoms.c, prev.atoms.o) else {
            diagnostics.warn_once(
                DiagnosticKind::MissingBackboneAtoms,
                format!("Cannot place the amide hydrogen of {residue}: N, or C/O of {prev}, is missing"),
            );
            continue;
        };
        let h = dssp_amide_hydrogen(&n, &c, &o).ok_or_else(|| AssignError::DegenerateGeometry {
            residue: residue.to_string(),
            reason: format!("C and O of {prev} coincide"),
        })?;
        residue.atoms.h = Some(h);
    }
    Ok(placed)
}

/// Runs every detector over a finished bond set.
///
/// # Return
///
/// The merged, globally ordered elements and the sheet edges between them.
fn assign_from_bonds(
    backbone: &BackboneIndex<'_>,
    bonds: &BondIndex,
    config: &AssignmentConfig,
    reporter: &ProgressReporter,
    diagnostics: &mut Diagnostics,
) -> Result<(Vec<Sse>, Vec<StrandLink>), AssignError> {
    let mut tagged: Vec<(Option<StrandId>, Sse)> = Vec::new();
    let mut graph = None;

    if config.detect_sheets {
        let sheets = &config.sheets;

        // === Phase 2: Ladders, turns and sheets ===
        let ladders = reporter.phase("Ladder Search", || {
            LadderSearch::new(backbone, bonds).find_ladders()
        })?;
        tagged.extend(
            c7_turns_and_wiggles(backbone, &ladders, sheets.strands_by_alpha, diagnostics)
                .into_iter()
                .map(|turn| (None, turn)),
        );

        let mut sheet_ladders = Vec::new();
        for ladder in ladders.into_iter().filter(|l| !l.is_c7_turn()) {
            let count = ladder
                .count_hbonds()
                .map_err(|e| invalid_ladder(backbone, &ladder, e))?;
            if count >= sheets.min_bonds_per_ladder {
                sheet_ladders.push(ladder);
            }
        }
        debug!(ladders = sheet_ladders.len(), "Ladders kept for sheet building.");

        let (sheet_graph, sheet_count) = reporter.phase("Sheets", || -> Result<_, AssignError> {
            let mut sheet_graph = SheetGraph::new(backbone, sheets);
            for ladder in &sheet_ladders {
                sheet_graph.add_ladder(ladder)?;
            }
            let seeds = sheet_graph.assign_sheet_ids()?;
            Ok((sheet_graph, seeds.len()))
        })?;

        // === Phase 3: Beta-bulges ===
        let (ids, mut strands): (Vec<StrandId>, Vec<Sse>) =
            sheet_graph.strands().into_iter().unzip();
        reporter.phase("Beta-Bulges", || {
            let classifier = BulgeClassifier::new(backbone, sheets);
            let bulges = classifier.find_bulges(&sheet_ladders);
            classifier.nest_sides(&bulges, &mut strands, sheets.bulges_by_alpha, diagnostics);
        });
        tagged.extend(ids.into_iter().map(Some).zip(strands));

        info!(
            ladders = sheet_ladders.len(),
            strands = sheet_graph.vertices().len(),
            "Sheet detection finished."
        );
        reporter.report(Progress::Message(format!(
            "{} strands in {} sheets",
            sheet_graph.vertices().len(),
            sheet_count
        )));
        graph = Some(sheet_graph);
    }

    // === Phase 4: Helices ===
    if config.detect_helices {
        let mut helices = reporter.phase("Helices", || {
            HelixDetector::new(backbone, bonds, &config.helices).find_helices()
        });
        if config.helices.merge_overlapping {
            helices = helix::merge_overlapping(helices, config.type_combining, diagnostics)?;
        }
        info!(helices = helices.len(), "Helix detection finished.");
        tagged.extend(helices.into_iter().map(|helix| (None, helix)));
    }

    // Stable, so equal keys keep the turns, strands, helices order.
    tagged.sort_by(|(_, x), (_, y)| x.order_key().cmp(&y.order_key()));

    let index_of: HashMap<StrandId, usize> = tagged
        .iter()
        .enumerate()
        .filter_map(|(i, (id, _))| id.map(|id| (id, i)))
        .collect();
    let connectivity = graph
        .map(|g| g.connectivity(&index_of))
        .unwrap_or_default();

    Ok((tagged.into_iter().map(|(_, sse)| sse).collect(), connectivity))
}
