use super::config::SheetConfig;
use super::hbonds::BackboneIndex;
use super::ladder::{BetaLadder, HBondDirection, LadderKind};
use crate::core::models::sse::{Sse, SseType};
use crate::core::utils::diagnostics::{DiagnosticKind, Diagnostics};
use itertools::Itertools;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulgeType {
    Classic,
    Wide,
    Antiparallel22,
    Antiparallel33,
    Antiparallel15,
    Antiparallel23,
    Parallel14,
    Parallel32,
    Parallel13,
    Parallel33,
}

impl BulgeType {
    pub fn kind(self) -> LadderKind {
        match self {
            BulgeType::Parallel14
            | BulgeType::Parallel32
            | BulgeType::Parallel13
            | BulgeType::Parallel33 => LadderKind::Parallel,
            _ => LadderKind::Antiparallel,
        }
    }

    /// Segment type of the short (hydrogen-donating) side.
    pub fn short_side_type(self) -> SseType {
        match self {
            BulgeType::Classic => SseType::BulgeClassicShort,
            BulgeType::Wide => SseType::BulgeWideShort,
            BulgeType::Antiparallel22 => SseType::BulgeAntiparallel22Short,
            BulgeType::Antiparallel33 => SseType::BulgeAntiparallel33Short,
            BulgeType::Antiparallel15 => SseType::BulgeAntiparallel15Short,
            BulgeType::Antiparallel23 => SseType::BulgeAntiparallel23Short,
            BulgeType::Parallel14 => SseType::BulgeParallel14Short,
            BulgeType::Parallel32 => SseType::BulgeParallel32Short,
            BulgeType::Parallel13 => SseType::BulgeParallel13Short,
            BulgeType::Parallel33 => SseType::BulgeParallel33Short,
        }
    }

    /// Segment type of the long (hydrogen-accepting) side.
    pub fn long_side_type(self) -> SseType {
        match self {
            BulgeType::Classic => SseType::BulgeClassicLong,
            BulgeType::Wide => SseType::BulgeWideLong,
            BulgeType::Antiparallel22 => SseType::BulgeAntiparallel22Long,
            BulgeType::Antiparallel33 => SseType::BulgeAntiparallel33Long,
            BulgeType::Antiparallel15 => SseType::BulgeAntiparallel15Long,
            BulgeType::Antiparallel23 => SseType::BulgeAntiparallel23Long,
            BulgeType::Parallel14 => SseType::BulgeParallel14Long,
            BulgeType::Parallel32 => SseType::BulgeParallel32Long,
            BulgeType::Parallel13 => SseType::BulgeParallel13Long,
            BulgeType::Parallel33 => SseType::BulgeParallel33Long,
        }
    }
}

/// An irregularity between two ladders sharing both strands.
///
/// Spans are inclusive residue-index ranges; Z spans run between the last
/// bonding group of the first ladder and the first bonding group of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetaBulge {
    pub bulge_type: BulgeType,
    pub short_side: (usize, usize),
    pub long_side: (usize, usize),
    pub short_z: (isize, isize),
    pub long_z: (isize, isize),
}

struct BulgeRule {
    bulge_type: BulgeType,
    /// Residues from `la.end0` to `lb.start0`.
    short_step: usize,
    /// Residues from `lb.end1` to `la.start1` (antiparallel) or from `la.end1`
    /// to `lb.start1` (parallel).
    long_step: usize,
    la_last: Option<HBondDirection>,
    lb_first: Option<HBondDirection>,
}

const fn rule(
    bulge_type: BulgeType,
    short_step: usize,
    long_step: usize,
    la_last: Option<HBondDirection>,
    lb_first: Option<HBondDirection>,
) -> BulgeRule {
    BulgeRule {
        bulge_type,
        short_step,
        long_step,
        la_last,
        lb_first,
    }
}

const TO1: Option<HBondDirection> = Some(HBondDirection::From0To1);
const TO0: Option<HBondDirection> = Some(HBondDirection::From1To0);

// Tried in order; the first match wins.
const ANTIPARALLEL_RULES: [BulgeRule; 6] = [
    rule(BulgeType::Classic, 0, 1, None, None),
    rule(BulgeType::Wide, 2, 3, TO0, TO1),
    rule(BulgeType::Antiparallel22, 1, 1, TO1, TO1),
    rule(BulgeType::Antiparallel33, 2, 2, TO1, TO1),
    rule(BulgeType::Antiparallel15, 0, 4, TO0, TO0),
    rule(BulgeType::Antiparallel23, 1, 2, TO1, TO1),
];

const PARALLEL_RULES: [BulgeRule; 4] = [
    rule(BulgeType::Parallel14, 0, 3, TO1, TO0),
    rule(BulgeType::Parallel32, 2, 1, TO0, TO1),
    rule(BulgeType::Parallel13, 0, 2, TO1, TO1),
    rule(BulgeType::Parallel33, 2, 2, TO0, TO1),
];

/// Recognises beta-bulges from pairs of ladders.
pub struct BulgeClassifier<'a> {
    backbone: &'a BackboneIndex<'a>,
    max_short_side_shift: isize,
    max_long_side_shift: isize,
    allow_antiparallel33: bool,
}

impl<'a> BulgeClassifier<'a> {
    pub fn new(backbone: &'a BackboneIndex<'a>, config: &SheetConfig) -> Self {
        Self {
            backbone,
            max_short_side_shift: config.max_short_side_shift,
            max_long_side_shift: config.max_long_side_shift,
            allow_antiparallel33: config.allow_antiparallel33,
        }
    }

    /// A bulge whose short side lies on strand 0 of both ladders, in either ladder order.
    pub fn classify(&self, la: &BetaLadder, lb: &BetaLadder) -> Option<BetaBulge> {
        self.classify_ordered(la, lb)
            .or_else(|| self.classify_ordered(lb, la))
    }

    fn classify_ordered(&self, la: &BetaLadder, lb: &BetaLadder) -> Option<BetaBulge> {
        let backbone = self.backbone;
        if !backbone.same_chain(la.start1, lb.start1) || la.kind != lb.kind {
            return None;
        }

        let short_z = (la.z_end0(), lb.z_start0());
        let long_z = match la.kind {
            LadderKind::Antiparallel => (lb.z_end1(), la.z_start1()),
            LadderKind::Parallel => (la.z_end1(), lb.z_start1()),
        };
        if short_z.1 - short_z.0 > self.max_short_side_shift
            && long_z.1 - long_z.0 > self.max_long_side_shift
        {
            return None;
        }

        let (rules, long_side): (&[BulgeRule], (usize, usize)) = match la.kind {
            LadderKind::Antiparallel => (&ANTIPARALLEL_RULES, (lb.end1, la.start1)),
            LadderKind::Parallel => (&PARALLEL_RULES, (la.end1, lb.start1)),
        };

        rules
            .iter()
            .filter(|r| self.allow_antiparallel33 || r.bulge_type != BulgeType::Antiparallel33)
            .find(|r| {
                backbone.residue_after(la.end0, r.short_step) == Some(lb.start0)
                    && backbone.residue_after(long_side.0, r.long_step) == Some(long_side.1)
                    && r.la_last.is_none_or(|d| la.last == d)
                    && r.lb_first.is_none_or(|d| lb.first == d)
            })
            .map(|r| BetaBulge {
                bulge_type: r.bulge_type,
                short_side: (la.end0, lb.start0),
                long_side,
                short_z,
                long_z,
            })
    }

    /// Every bulge formed by any two of `ladders`, each ladder taken from both sides.
    pub fn find_bulges(&self, ladders: &[BetaLadder]) -> Vec<BetaBulge> {
        let both_sides = ladders
            .iter()
            .copied()
            .chain(ladders.iter().map(BetaLadder::inverted))
            .collect_vec();
        let bulges = both_sides
            .iter()
            .tuple_combinations()
            .filter_map(|(la, lb)| self.classify(la, lb))
            .collect_vec();
        debug!(bulges = bulges.len(), "Beta-bulge search finished.");
        bulges
    }

    /// Labels both sides of every bulge and nests each inside the one strand
    /// that encloses it, inheriting that strand's sheet id.
    ///
    /// A side enclosed by no strand, or by several, is reported and skipped.
    pub fn nest_sides(
        &self,
        bulges: &[BetaBulge],
        strands: &mut [Sse],
        by_alpha: bool,
        diagnostics: &mut Diagnostics,
    ) {
        for (counter, bulge) in bulges.iter().enumerate() {
            let (short, long) = self.side_segments(bulge, by_alpha);
            for side in [short, long] {
                let label = format!("{}{counter}", side.sse_type);
                let mut side = side.with_label(label);
                let enclosing = strands.iter().positions(|s| s.contains(&side)).collect_vec();
                match enclosing.as_slice() {
                    [only] => {
                        side.sheet_id = strands[*only].sheet_id;
                        strands[*only].add_nested(side);
                    }
                    _ => diagnostics.warn(
                        DiagnosticKind::BulgeSideNotInStrand,
                        format!(
                            "Beta-bulge side {} {} {}-{} is enclosed by {} beta-strands instead of one",
                            side.label.as_deref().unwrap_or(""),
                            side.chain_id,
                            side.start,
                            side.end,
                            enclosing.len()
                        ),
                    ),
                }
            }
        }
    }

    /// Unlabelled segments for the short and long side of `bulge`.
    ///
    /// With `by_alpha`, a side keeps only the residues whose alpha carbon
    /// (Z = 3i + 1) lies between the bounding hydrogen-bond groups.
    pub fn side_segments(&self, bulge: &BetaBulge, by_alpha: bool) -> (Sse, Sse) {
        let short = self.side_segment(
            bulge.short_side,
            bulge.short_z,
            by_alpha,
            bulge.bulge_type.short_side_type(),
        );
        let long = self.side_segment(
            bulge.long_side,
            bulge.long_z,
            by_alpha,
            bulge.bulge_type.long_side_type(),
        );
        (short, long)
    }

    fn side_segment(
        &self,
        (first, last): (usize, usize),
        (z_from, z_to): (isize, isize),
        by_alpha: bool,
        sse_type: SseType,
    ) -> Sse {
        let (first, last) = if by_alpha {
            let mut inside = (first..=last).filter(|&r| (z_from..=z_to).contains(&(3 * r as isize + 1)));
            match inside.next() {
                Some(a) => (a, inside.last().unwrap_or(a)),
                None => (first, last),
            }
        } else {
            (first, last)
        };
        Sse::new(
            None,
            self.backbone.chain_id(first),
            self.backbone.seq_number(first),
            self.backbone.seq_number(last),
            sse_type,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::Residue;
    use crate::engine::config::AssignmentConfig;
    use crate::engine::hbonds::backbone::test_support::chain_of;
    use crate::engine::ladder::test_support::contiguous_chain;
    use HBondDirection::{From0To1, From1To0};

    fn ladder(
        kind: LadderKind,
        (start0, end0): (usize, usize),
        (start1, end1): (usize, usize),
        first: HBondDirection,
        last: HBondDirection,
    ) -> BetaLadder {
        BetaLadder {
            kind,
            start0,
            end0,
            start1,
            end1,
            first,
            last,
        }
    }

    fn classifier<'a>(backbone: &'a BackboneIndex<'a>, config: &SheetConfig) -> BulgeClassifier<'a> {
        BulgeClassifier::new(backbone, config)
    }

    fn default_sheets() -> SheetConfig {
        AssignmentConfig::default().sheets
    }

    fn a33_pair() -> (BetaLadder, BetaLadder) {
        (
            ladder(LadderKind::Antiparallel, (0, 4), (24, 28), From0To1, From0To1),
            ladder(LadderKind::Antiparallel, (6, 8), (20, 22), From0To1, From1To0),
        )
    }

    #[test]
    fn antiparallel33_is_found_in_either_ladder_order() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let (la, lb) = a33_pair();

        let bulge = c.classify(&la, &lb).unwrap();
        assert_eq!(bulge.bulge_type, BulgeType::Antiparallel33);
        assert_eq!(bulge.short_side, (4, 6));
        assert_eq!(bulge.long_side, (22, 24));
        assert_eq!(c.classify(&lb, &la), Some(bulge));
    }

    #[test]
    fn antiparallel33_can_be_disabled() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let config = SheetConfig {
            allow_antiparallel33: false,
            ..default_sheets()
        };
        let (la, lb) = a33_pair();
        assert_eq!(classifier(&backbone, &config).classify(&la, &lb), None);
    }

    #[test]
    fn gap_is_rejected_only_when_it_exceeds_both_shift_bounds() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let (la, lb) = a33_pair();

        let both_zero = SheetConfig {
            max_short_side_shift: 0,
            max_long_side_shift: 0,
            ..default_sheets()
        };
        assert_eq!(classifier(&backbone, &both_zero).classify(&la, &lb), None);

        let short_zero = SheetConfig {
            max_short_side_shift: 0,
            ..default_sheets()
        };
        let bulge = classifier(&backbone, &short_zero).classify(&la, &lb).unwrap();
        assert_eq!(bulge.bulge_type, BulgeType::Antiparallel33);
        assert_eq!((bulge.short_z, bulge.long_z), ((12, 18), (68, 74)));

        let long_zero = SheetConfig {
            max_long_side_shift: 0,
            ..default_sheets()
        };
        assert!(classifier(&backbone, &long_zero).classify(&la, &lb).is_some());
    }

    #[test]
    fn classic_bulge_accepts_any_bond_directions() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let la = ladder(LadderKind::Antiparallel, (0, 4), (24, 28), From1To0, From1To0);
        let lb = ladder(LadderKind::Antiparallel, (4, 8), (19, 23), From1To0, From0To1);

        let bulge = c.classify(&la, &lb).unwrap();
        assert_eq!(bulge.bulge_type, BulgeType::Classic);
        assert_eq!(bulge.long_side, (23, 24));

        let (short, long) = c.side_segments(&bulge, false);
        assert_eq!((short.start, short.end, short.sse_type), (5, 5, SseType::BulgeClassicShort));
        assert_eq!((long.start, long.end, long.sse_type), (24, 25, SseType::BulgeClassicLong));
    }

    #[test]
    fn parallel13_bulge() {
        let residues = contiguous_chain(20);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let la = ladder(LadderKind::Parallel, (0, 2), (10, 12), From0To1, From0To1);
        let lb = ladder(LadderKind::Parallel, (2, 4), (14, 16), From0To1, From0To1);

        let bulge = c.classify(&la, &lb).unwrap();
        assert_eq!(bulge.bulge_type, BulgeType::Parallel13);
        assert_eq!(bulge.bulge_type.kind(), LadderKind::Parallel);
        assert_eq!(bulge.short_side, (2, 2));
        assert_eq!(bulge.long_side, (12, 14));
    }

    #[test]
    fn mixed_kinds_and_chain_breaks_are_not_bulges() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let (la, lb) = a33_pair();
        let parallel_lb = BetaLadder {
            kind: LadderKind::Parallel,
            ..lb
        };
        assert_eq!(c.classify(&la, &parallel_lb), None);

        // Same indices, but sequence number 24 is missing.
        let mut gapped: Vec<Residue> = chain_of("A", 1..=23);
        gapped.extend(chain_of("A", 25..=31));
        let backbone = BackboneIndex::new(&gapped).unwrap();
        assert_eq!(classifier(&backbone, &default_sheets()).classify(&la, &lb), None);
    }

    #[test]
    fn side_segments_by_alpha_keep_residues_between_bond_groups() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let (la, lb) = a33_pair();
        let bulge = c.classify(&la, &lb).unwrap();

        let (short, long) = c.side_segments(&bulge, true);
        assert_eq!((short.start, short.end), (5, 6));
        assert_eq!((long.start, long.end), (24, 25));
        assert_eq!(short.sse_type.code(), "u");
        assert_eq!(long.sse_type.code(), "U");

        let (short, long) = c.side_segments(&bulge, false);
        assert_eq!((short.start, short.end), (5, 7));
        assert_eq!((long.start, long.end), (23, 25));
    }

    #[test]
    fn find_bulges_reports_each_bulge_once() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let (la, lb) = a33_pair();

        let bulges = c.find_bulges(&[la, lb]);

        assert_eq!(bulges.len(), 1);
        assert_eq!(bulges[0].bulge_type, BulgeType::Antiparallel33);
    }

    #[test]
    fn sides_nest_into_the_enclosing_strands() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let (la, lb) = a33_pair();
        let bulges = c.find_bulges(&[la, lb]);
        let mut strands = vec![
            Sse::new(Some("E0".into()), "A", 1, 9, SseType::Sheet, Some(1)),
            Sse::new(Some("E1".into()), "A", 21, 29, SseType::Sheet, Some(1)),
        ];
        let mut diagnostics = Diagnostics::new();

        c.nest_sides(&bulges, &mut strands, false, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(strands[0].nested.len(), 1);
        assert_eq!(strands[0].nested[0].label.as_deref(), Some("u0"));
        assert_eq!(strands[0].nested[0].sheet_id, Some(1));
        assert_eq!(strands[1].nested[0].label.as_deref(), Some("U0"));
    }

    #[test]
    fn side_outside_every_strand_is_reported() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let c = classifier(&backbone, &default_sheets());
        let (la, lb) = a33_pair();
        let bulges = c.find_bulges(&[la, lb]);
        let mut strands = vec![Sse::new(Some("E0".into()), "A", 1, 9, SseType::Sheet, Some(1))];
        let mut diagnostics = Diagnostics::new();

        c.nest_sides(&bulges, &mut strands, false, &mut diagnostics);

        assert_eq!(strands[0].nested.len(), 1);
        assert_eq!(diagnostics.count_of(DiagnosticKind::BulgeSideNotInStrand), 1);
    }
}
