use super::error::AssignError;
use super::hbonds::{BackboneIndex, BondIndex};
use crate::core::models::sse::SseType;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LadderKind {
    Parallel,
    Antiparallel,
}

/// Direction of one ladder hydrogen bond, in terms of the strand that donates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HBondDirection {
    From0To1,
    From1To0,
}

impl HBondDirection {
    pub fn inverted(self) -> Self {
        match self {
            HBondDirection::From0To1 => HBondDirection::From1To0,
            HBondDirection::From1To0 => HBondDirection::From0To1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LadderShapeError {
    #[error("antiparallel strands have different lengths")]
    UnequalStrands,
    #[error("antiparallel strands have odd lengths")]
    OddLength,
    #[error("parallel strands have incompatible lengths")]
    IncompatibleLengths,
    #[error("only {count} hydrogen bond(s)")]
    TooFewBonds { count: usize },
}

/// Two paired backbone segments held together by a regular pattern of hydrogen bonds.
///
/// Indices address residues in the assignment input. Strand 0 runs
/// `start0..=end0`; strand 1 runs `start1..=end1` in both ladder kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BetaLadder {
    pub kind: LadderKind,
    pub start0: usize,
    pub end0: usize,
    pub start1: usize,
    pub end1: usize,
    pub first: HBondDirection,
    pub last: HBondDirection,
}

// Z runs along a strand at three units per residue: Z = 3i for the NH group
// of residue i and Z = 3i + 2 for its CO group.
fn z(index: usize, carbonyl: bool) -> isize {
    3 * index as isize + if carbonyl { 2 } else { 0 }
}

impl BetaLadder {
    pub fn z_start0(&self) -> isize {
        z(self.start0, self.first == HBondDirection::From1To0)
    }

    pub fn z_end0(&self) -> isize {
        z(self.end0, self.last == HBondDirection::From1To0)
    }

    pub fn z_start1(&self) -> isize {
        match self.kind {
            LadderKind::Parallel => z(self.start1, self.first == HBondDirection::From0To1),
            LadderKind::Antiparallel => z(self.start1, self.last == HBondDirection::From0To1),
        }
    }

    pub fn z_end1(&self) -> isize {
        match self.kind {
            LadderKind::Parallel => z(self.end1, self.last == HBondDirection::From0To1),
            LadderKind::Antiparallel => z(self.end1, self.first == HBondDirection::From0To1),
        }
    }

    /// The same ladder seen from strand 1.
    pub fn inverted(&self) -> Self {
        let (first, last) = match self.kind {
            LadderKind::Antiparallel => (self.last.inverted(), self.first.inverted()),
            LadderKind::Parallel => (self.first.inverted(), self.last.inverted()),
        };
        Self {
            kind: self.kind,
            start0: self.start1,
            end0: self.end1,
            start1: self.start0,
            end1: self.end0,
            first,
            last,
        }
    }

    /// A ladder whose strands start on the same residue is a C7 turn (i+2 -> i
    /// bond), not a pairing of two strands.
    pub fn is_c7_turn(&self) -> bool {
        self.start0 == self.start1
    }

    /// Validates the strand shapes and returns the number of hydrogen bonds.
    pub fn count_hbonds(&self) -> Result<usize, LadderShapeError> {
        let len0 = self.end0 as isize - self.start0 as isize;
        let len1 = self.end1 as isize - self.start1 as isize;
        let count = match self.kind {
            LadderKind::Antiparallel => {
                if len0 != len1 {
                    return Err(LadderShapeError::UnequalStrands);
                }
                if len0 % 2 != 0 {
                    return Err(LadderShapeError::OddLength);
                }
                (len0 + 2) as usize
                    - usize::from(self.first == HBondDirection::From1To0)
                    - usize::from(self.last == HBondDirection::From0To1)
            }
            LadderKind::Parallel => {
                let expected = if self.first == HBondDirection::From1To0 { 2 } else { 0 }
                    - if self.last == HBondDirection::From1To0 { 2 } else { 0 };
                if len0 - len1 != expected {
                    return Err(LadderShapeError::IncompatibleLengths);
                }
                (1 + (len0 + len1) / 2) as usize
            }
        };
        if count < 2 {
            return Err(LadderShapeError::TooFewBonds { count });
        }
        Ok(count)
    }
}

/// Mutable ladder under construction; frozen into a [`BetaLadder`] by [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct LadderBuilder {
    ladder: BetaLadder,
}

impl LadderBuilder {
    /// Starts a ladder from a single bond between residues `res0` and `res1`.
    pub fn new(kind: LadderKind, res0: usize, res1: usize, direction: HBondDirection) -> Self {
        Self {
            ladder: BetaLadder {
                kind,
                start0: res0,
                end0: res0,
                start1: res1,
                end1: res1,
                first: direction,
                last: direction,
            },
        }
    }

    /// Appends the next hydrogen bond of the ladder's pattern.
    pub fn add_one_hbond(&mut self) {
        let l = &mut self.ladder;
        match (l.kind, l.last) {
            (LadderKind::Antiparallel, HBondDirection::From0To1) => {
                l.last = HBondDirection::From1To0;
            }
            (LadderKind::Antiparallel, HBondDirection::From1To0) => {
                l.end0 += 2;
                l.start1 -= 2;
                l.last = HBondDirection::From0To1;
            }
            (LadderKind::Parallel, HBondDirection::From0To1) => {
                l.end1 += 2;
                l.last = HBondDirection::From1To0;
            }
            (LadderKind::Parallel, HBondDirection::From1To0) => {
                l.end0 += 2;
                l.last = HBondDirection::From0To1;
            }
        }
    }

    pub fn current(&self) -> &BetaLadder {
        &self.ladder
    }

    pub fn finish(self) -> BetaLadder {
        self.ladder
    }
}

/// Bonds already explained by a built ladder, keyed `(residue, partner)`.
#[derive(Debug, Default)]
struct RedundantMotifs {
    to_antiparallel: HashSet<(usize, usize)>,
    from_antiparallel: HashSet<(usize, usize)>,
    to_parallel: HashSet<(usize, usize)>,
    from_parallel: HashSet<(usize, usize)>,
}

impl RedundantMotifs {
    fn register(&mut self, l: &BetaLadder) {
        let span = l.end0 - l.start0;
        match l.kind {
            LadderKind::Antiparallel => {
                if l.first == HBondDirection::From0To1 {
                    self.to_antiparallel.insert((l.start0, l.end1));
                }
                for i in (2..=span).step_by(2) {
                    self.to_antiparallel.insert((l.start0 + i, l.end1 - i));
                }
                for i in (0..span).step_by(2) {
                    self.from_antiparallel.insert((l.start0 + i, l.end1 - i));
                }
                if l.last == HBondDirection::From1To0 {
                    self.from_antiparallel.insert((l.end0, l.start1));
                }
            }
            LadderKind::Parallel => {
                if l.first == HBondDirection::From0To1 {
                    for i in (0..=span).step_by(2) {
                        self.to_parallel.insert((l.start0 + i, l.start1 + i));
                    }
                    for i in (0..span).step_by(2) {
                        self.from_parallel.insert((l.start0 + i, l.start1 + 2 + i));
                    }
                } else {
                    for i in (2..=span).step_by(2) {
                        self.to_parallel.insert((l.start0 + i, l.start1 + i - 2));
                    }
                    for i in (0..span).step_by(2) {
                        self.from_parallel.insert((l.start0 + i, l.start1 + i));
                    }
                }
                if l.last == HBondDirection::From1To0 {
                    self.from_parallel.insert((l.end0, l.end1));
                }
            }
        }
    }
}

/// Finds every beta-ladder (including C7 self-ladders) in a bond set.
///
/// Each residue is examined once, in input order, against its higher-indexed
/// partners. A discovered ladder is grown for as long as its bond pattern
/// continues, and the bonds it covers are then excluded from seeding new ladders.
pub struct LadderSearch<'a> {
    backbone: &'a BackboneIndex<'a>,
    bonds: &'a BondIndex,
    redundant: RedundantMotifs,
}

impl<'a> LadderSearch<'a> {
    pub fn new(backbone: &'a BackboneIndex<'a>, bonds: &'a BondIndex) -> Self {
        Self {
            backbone,
            bonds,
            redundant: RedundantMotifs::default(),
        }
    }

    pub fn find_ladders(mut self) -> Result<Vec<BetaLadder>, AssignError> {
        let mut ladders = Vec::new();
        let backbone = self.backbone;
        let bonds = self.bonds;

        for i in 0..backbone.len() {
            let found_before = ladders.len();

            for &j in bonds.acceptors_of(i).iter().filter(|&&j| j > i) {
                // Motif A: i -> j and j -> i.
                if !self.redundant.to_antiparallel.contains(&(i, j)) && bonds.is_hbond(j, i) {
                    ladders.push(self.grow(LadderKind::Antiparallel, i, j, HBondDirection::From0To1)?);
                }
                // Motif C: i -> j and j+2 -> i.
                if !self.redundant.to_parallel.contains(&(i, j))
                    && bonds.is_hbond_between(backbone.residue_after(j, 2), Some(i))
                {
                    ladders.push(self.grow(LadderKind::Parallel, i, j, HBondDirection::From0To1)?);
                }
            }

            for &j in bonds.donors_of(i).iter().filter(|&&j| j > i) {
                // Motif B: j -> i and i+2 -> j-2.
                if !self.redundant.from_antiparallel.contains(&(i, j))
                    && bonds.is_hbond_between(
                        backbone.residue_after(i, 2),
                        backbone.residue_before(j, 2),
                    )
                {
                    ladders.push(self.grow(LadderKind::Antiparallel, i, j, HBondDirection::From1To0)?);
                }
                // Motif D: j -> i and i+2 -> j.
                if !self.redundant.from_parallel.contains(&(i, j))
                    && bonds.is_hbond_between(backbone.residue_after(i, 2), Some(j))
                {
                    ladders.push(self.grow(LadderKind::Parallel, i, j, HBondDirection::From1To0)?);
                }
            }

            if ladders.len() - found_before > 1 {
                trace!(
                    residue = %backbone.residue(i),
                    "More than one beta-ladder motif found from one residue."
                );
            }
        }

        debug!(ladders = ladders.len(), "Beta-ladder search finished.");
        Ok(ladders)
    }

    fn grow(
        &mut self,
        kind: LadderKind,
        res0: usize,
        res1: usize,
        direction: HBondDirection,
    ) -> Result<BetaLadder, AssignError> {
        let mut builder = LadderBuilder::new(kind, res0, res1, direction);
        builder.add_one_hbond();
        while self.can_extend(builder.current()) {
            builder.add_one_hbond();
        }
        let ladder = builder.finish();

        ladder
            .count_hbonds()
            .map_err(|e| invalid_ladder(self.backbone, &ladder, e))?;
        self.redundant.register(&ladder);
        trace!(ladder = %LadderDisplay(self.backbone, &ladder), "Built beta-ladder.");
        Ok(ladder)
    }

    fn can_extend(&self, l: &BetaLadder) -> bool {
        let backbone = self.backbone;
        let bonds = self.bonds;
        match (l.kind, l.last) {
            (LadderKind::Antiparallel, HBondDirection::From0To1) => {
                // Never grow past the tip of a hairpin.
                backbone
                    .residue_after(l.end0, 2)
                    .is_some_and(|k| bonds.is_hbond(l.start1, l.end0) && l.start1 > k)
            }
            (LadderKind::Antiparallel, HBondDirection::From1To0) => bonds.is_hbond_between(
                backbone.residue_after(l.end0, 2),
                backbone.residue_before(l.start1, 2),
            ),
            (LadderKind::Parallel, HBondDirection::From0To1) => {
                bonds.is_hbond_between(backbone.residue_after(l.end1, 2), Some(l.end0))
            }
            (LadderKind::Parallel, HBondDirection::From1To0) => {
                bonds.is_hbond_between(backbone.residue_after(l.end0, 2), Some(l.end1))
            }
        }
    }
}

pub(crate) fn invalid_ladder(backbone: &BackboneIndex<'_>, ladder: &BetaLadder, error: LadderShapeError) -> AssignError {
    AssignError::InvalidLadder {
        ladder: LadderDisplay(backbone, ladder).to_string(),
        reason: error.to_string(),
    }
}

/// Formats a ladder as `[A 10-14 : A 30-34 v^]`; `v` marks a 0->1 bond, `^` a 1->0 bond.
pub struct LadderDisplay<'b>(pub &'b BackboneIndex<'b>, pub &'b BetaLadder);

impl fmt::Display for LadderDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let LadderDisplay(backbone, l) = self;
        let arrow = |d: HBondDirection| match d {
            HBondDirection::From0To1 => 'v',
            HBondDirection::From1To0 => '^',
        };
        write!(
            f,
            "[{} {}-{} : {} {}-{} {}{}]",
            backbone.chain_id(l.start0),
            backbone.seq_number(l.start0),
            backbone.seq_number(l.end0),
            backbone.chain_id(l.start1),
            backbone.seq_number(l.start1),
            backbone.seq_number(l.end1),
            arrow(l.first),
            arrow(l.last)
        )
    }
}

/// Residue range (chain, first, last sequence number) of one ladder strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandSpan {
    pub chain_id: String,
    pub start: isize,
    pub end: isize,
}

/// Strand 0 of `ladder`. With `by_alpha`, end residues that only contribute
/// their NH or CO group to the outermost bond are left out.
pub fn strand0_span(backbone: &BackboneIndex<'_>, ladder: &BetaLadder, by_alpha: bool) -> StrandSpan {
    let mut start = backbone.seq_number(ladder.start0);
    let mut end = backbone.seq_number(ladder.end0);
    if by_alpha {
        if ladder.first == HBondDirection::From1To0 {
            start += 1;
        }
        if ladder.last == HBondDirection::From0To1 {
            end -= 1;
        }
    }
    StrandSpan {
        chain_id: backbone.chain_id(ladder.start0).to_string(),
        start,
        end,
    }
}

/// Strand 1 of `ladder`, trimmed like [`strand0_span`].
pub fn strand1_span(backbone: &BackboneIndex<'_>, ladder: &BetaLadder, by_alpha: bool) -> StrandSpan {
    let mut start = backbone.seq_number(ladder.start1);
    let mut end = backbone.seq_number(ladder.end1);
    if by_alpha {
        let (trim_start, trim_end) = match ladder.kind {
            LadderKind::Antiparallel => (
                ladder.last == HBondDirection::From0To1,
                ladder.first == HBondDirection::From1To0,
            ),
            LadderKind::Parallel => (
                ladder.first == HBondDirection::From0To1,
                ladder.last == HBondDirection::From1To0,
            ),
        };
        if trim_start {
            start += 1;
        }
        if trim_end {
            end -= 1;
        }
    }
    StrandSpan {
        chain_id: backbone.chain_id(ladder.start1).to_string(),
        start,
        end,
    }
}

/// Turn for C7 self-ladders, sheet for ladders of more than two bonds,
/// isolated bridge otherwise.
pub fn ladder_sse_type(backbone: &BackboneIndex<'_>, ladder: &BetaLadder) -> Result<SseType, AssignError> {
    if ladder.is_c7_turn() {
        if backbone.seq_number(ladder.end0) - backbone.seq_number(ladder.start0) != 2 {
            return Err(AssignError::InvalidLadder {
                ladder: LadderDisplay(backbone, ladder).to_string(),
                reason: "C7 turn with more than one stabilizing hydrogen bond".to_string(),
            });
        }
        return Ok(SseType::TurnC7);
    }
    let count = ladder
        .count_hbonds()
        .map_err(|e| invalid_ladder(backbone, ladder, e))?;
    Ok(if count > 2 {
        SseType::Sheet
    } else {
        SseType::IsolatedBridge
    })
}
