use super::hbonds::BackboneIndex;
use super::ladder::{BetaLadder, strand0_span};
use crate::core::models::sse::{Sse, SseType};
use crate::core::utils::diagnostics::{DiagnosticKind, Diagnostics};
use itertools::Itertools;

/// Builds C7 turns and wiggles from the self-ladders in `ladders`.
///
/// Each self-ladder (an `i + 2 -> i` bond) marks one turn. Turns on one chain
/// whose ends advance by exactly one residue are fused; a fused run spanning
/// more than three residues is a wiggle (`W`), anything shorter a turn (`C`).
pub fn c7_turns_and_wiggles(
    backbone: &BackboneIndex<'_>,
    ladders: &[BetaLadder],
    by_alpha: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<Sse> {
    for l in ladders.iter().filter(|l| l.is_c7_turn() && l.end0 - l.start0 > 2) {
        diagnostics.warn(
            DiagnosticKind::LongC7Ladder,
            format!(
                "Strange secondary structure in chain {} {}-{}",
                backbone.chain_id(l.start0),
                backbone.seq_number(l.start0),
                backbone.seq_number(l.end0)
            ),
        );
    }

    let turns = ladders
        .iter()
        .filter(|l| l.is_c7_turn())
        .sorted_by_key(|l| l.start0)
        .map(|l| strand0_span(backbone, l, by_alpha));

    let mut runs: Vec<(String, isize, isize)> = Vec::new();
    for turn in turns {
        match runs.last_mut() {
            Some((chain, _, last)) if *chain == turn.chain_id && turn.end == *last + 1 => {
                *last += 1;
            }
            _ => runs.push((turn.chain_id, turn.start, turn.end)),
        }
    }

    runs.into_iter()
        .enumerate()
        .map(|(i, (chain, first, last))| {
            let sse_type = if last - first > 2 {
                SseType::WiggleC7
            } else {
                SseType::TurnC7
            };
            Sse::new(Some(format!("{sse_type}{i}")), &chain, first, last, sse_type, None)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hbonds::backbone::test_support::chain_of;
    use crate::engine::ladder::HBondDirection::{From0To1, From1To0};
    use crate::engine::ladder::LadderKind;
    use crate::engine::ladder::test_support::contiguous_chain;

    fn c7(i: usize) -> BetaLadder {
        BetaLadder {
            kind: LadderKind::Antiparallel,
            start0: i,
            end0: i + 2,
            start1: i,
            end1: i + 2,
            first: From1To0,
            last: From0To1,
        }
    }

    #[test]
    fn isolated_turns_stay_separate() {
        let residues = contiguous_chain(20);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let mut diagnostics = Diagnostics::new();

        let sses = c7_turns_and_wiggles(&backbone, &[c7(10), c7(2)], true, &mut diagnostics);

        let summary: Vec<_> = sses
            .iter()
            .map(|s| (s.label.clone().unwrap(), s.start, s.end))
            .collect();
        assert_eq!(summary, vec![("C0".to_string(), 4, 4), ("C1".to_string(), 12, 12)]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn consecutive_turns_fuse_and_long_runs_become_wiggles() {
        let residues = contiguous_chain(30);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let mut diagnostics = Diagnostics::new();
        let ladders = [c7(1), c7(2), c7(3), c7(10), c7(11), c7(12), c7(13)];

        let sses = c7_turns_and_wiggles(&backbone, &ladders, true, &mut diagnostics);

        assert_eq!(sses.len(), 2);
        assert_eq!((sses[0].start, sses[0].end, sses[0].sse_type), (3, 5, SseType::TurnC7));
        // The last run is emitted too.
        assert_eq!((sses[1].start, sses[1].end, sses[1].sse_type), (12, 15, SseType::WiggleC7));
        assert_eq!(sses[1].label.as_deref(), Some("W1"));
    }

    #[test]
    fn turns_on_different_chains_are_not_fused() {
        // Chain B continues the numbering, so its turn would otherwise extend A's.
        let mut residues = contiguous_chain(6);
        residues.extend(chain_of("B", 5..=10));
        let backbone = BackboneIndex::new(&residues).unwrap();
        let mut diagnostics = Diagnostics::new();

        let sses = c7_turns_and_wiggles(&backbone, &[c7(3), c7(6)], true, &mut diagnostics);

        assert_eq!(sses.len(), 2);
        assert_eq!((sses[0].start, sses[1].start), (5, 6));
        assert_eq!(sses[0].chain_id, "A");
        assert_eq!(sses[1].chain_id, "B");
    }

    #[test]
    fn overlong_self_ladder_is_reported() {
        let residues = contiguous_chain(10);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let mut diagnostics = Diagnostics::new();
        let long = BetaLadder { end0: 5, end1: 5, ..c7(1) };

        c7_turns_and_wiggles(&backbone, &[long], false, &mut diagnostics);

        assert_eq!(diagnostics.count_of(DiagnosticKind::LongC7Ladder), 1);
    }
}
