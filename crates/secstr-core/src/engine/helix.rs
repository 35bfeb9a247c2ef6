use super::config::HelixConfig;
use super::hbonds::{BackboneIndex, BondIndex};
use crate::core::models::sse::{self, Sse, SseJoinError, SseType, TypeCombining};
use crate::core::utils::diagnostics::Diagnostics;
use tracing::debug;

/// Helix families by hydrogen-bond pitch: `i + x -> i`.
const HELIX_PITCHES: [(usize, SseType); 3] = [
    (3, SseType::HelixG),
    (4, SseType::HelixH),
    (5, SseType::HelixI),
];

pub struct HelixDetector<'a> {
    backbone: &'a BackboneIndex<'a>,
    bonds: &'a BondIndex,
    config: HelixConfig,
}

impl<'a> HelixDetector<'a> {
    pub fn new(backbone: &'a BackboneIndex<'a>, bonds: &'a BondIndex, config: &HelixConfig) -> Self {
        Self {
            backbone,
            bonds,
            config: *config,
        }
    }

    /// 3-10, alpha and pi helices, in that order, labelled `<code><index>`.
    pub fn find_helices(&self) -> Vec<Sse> {
        let helices: Vec<Sse> = HELIX_PITCHES
            .iter()
            .flat_map(|&(pitch, sse_type)| self.helices_of_pitch(pitch, sse_type))
            .enumerate()
            .map(|(i, sse)| {
                let label = format!("{}{i}", sse.sse_type);
                sse.with_label(label)
            })
            .collect();
        debug!(helices = helices.len(), "Helix search finished.");
        helices
    }

    /// Runs of consecutive `(i + pitch) -> i` bonds.
    ///
    /// A run of at least `min_bonds_per_helix` bonds starting at acceptor `s`
    /// and ending at donor `e` spans `s..=e`, or `s + 1..=e - 1` when helices are
    /// taken by alpha carbons.
    pub fn helices_of_pitch(&self, pitch: usize, sse_type: SseType) -> Vec<Sse> {
        let mut helices = Vec::new();
        let mut current: Option<(usize, usize)> = None;

        for i in 0..self.backbone.len() {
            let donor = self.backbone.residue_after(i, pitch);
            let bonded = self.bonds.is_hbond_between(donor, Some(i));
            match (current, donor) {
                (None, Some(j)) if bonded => current = Some((i, j)),
                (Some((start, _)), Some(j)) if bonded => current = Some((start, j)),
                (Some((start, end)), _) => {
                    helices.extend(self.accept(start, end, i - start, sse_type));
                    current = None;
                }
                _ => {}
            }
        }
        // No run can still be open here: the last residue has no donor `pitch` residues later.
        helices
    }

    fn accept(&self, start: usize, end: usize, bond_count: usize, sse_type: SseType) -> Option<Sse> {
        if bond_count < self.config.min_bonds_per_helix {
            return None;
        }
        let trim = isize::from(self.config.helices_by_alpha);
        Some(Sse::new(
            None,
            self.backbone.chain_id(start),
            self.backbone.seq_number(start) + trim,
            self.backbone.seq_number(end) - trim,
            sse_type,
            None,
        ))
    }
}

/// Fuses helices of one chain that overlap or touch into joined elements.
///
/// Helices are visited by chain and start; a helix starting at most one
/// residue after the running end of the current group extends that group.
/// Groups of one are returned unchanged.
pub fn merge_overlapping(
    mut helices: Vec<Sse>,
    combining: TypeCombining,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Sse>, SseJoinError> {
    helices.sort_by(|x, y| x.order_key().cmp(&y.order_key()));

    // Each group carries its running end.
    let mut groups: Vec<(Vec<Sse>, isize)> = Vec::new();
    for helix in helices {
        match groups.last_mut() {
            Some((group, end)) if group[0].chain_id == helix.chain_id && helix.start <= *end + 1 => {
                *end = (*end).max(helix.end);
                group.push(helix);
            }
            _ => {
                let end = helix.end;
                groups.push((vec![helix], end));
            }
        }
    }

    let merged = groups
        .into_iter()
        .map(|(mut group, _)| match group.len() {
            1 => Ok(group.remove(0)),
            _ => sse::join(group, combining, diagnostics),
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(helices = merged.len(), "Merged overlapping helices.");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::sse::default_type_combining;
    use crate::engine::config::AssignmentConfig;
    use crate::engine::ladder::test_support::contiguous_chain;

    fn alpha_bonds(n: usize, acceptors: impl IntoIterator<Item = usize>) -> BondIndex {
        BondIndex::from_pairs(n, acceptors.into_iter().map(|i| (i + 4, i)))
    }

    #[test]
    fn run_of_alpha_bonds_gives_one_helix() {
        let residues = contiguous_chain(20);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let bonds = alpha_bonds(20, 2..=6);
        let detector = HelixDetector::new(&backbone, &bonds, &AssignmentConfig::default().helices);

        let helices = detector.find_helices();

        assert_eq!(helices.len(), 1);
        let h = &helices[0];
        assert_eq!(h.sse_type, SseType::HelixH);
        // Acceptors 2..=6 (seq 3..=7), donors 6..=10 (seq 7..=11).
        assert_eq!((h.start, h.end), (4, 10));
        assert_eq!(h.label.as_deref(), Some("H0"));
    }

    #[test]
    fn single_bond_is_not_a_helix() {
        let residues = contiguous_chain(20);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let bonds = alpha_bonds(20, [5, 10, 11]);
        let detector = HelixDetector::new(&backbone, &bonds, &AssignmentConfig::default().helices);

        let helices = detector.helices_of_pitch(4, SseType::HelixH);

        assert_eq!(helices.len(), 1);
        assert_eq!((helices[0].start, helices[0].end), (12, 15));
    }

    #[test]
    fn overlapping_helices_of_one_chain_become_a_mixed_helix() {
        let helices = vec![
            Sse::new(Some("H1".into()), "A", 10, 20, SseType::HelixH, None),
            Sse::new(Some("G0".into()), "A", 3, 9, SseType::HelixG, None),
            Sse::new(Some("H2".into()), "A", 30, 35, SseType::HelixH, None),
            Sse::new(Some("H3".into()), "B", 21, 25, SseType::HelixH, None),
        ];
        let mut diagnostics = Diagnostics::new();

        let merged =
            merge_overlapping(helices, default_type_combining, &mut diagnostics).unwrap();

        assert_eq!(merged.len(), 3);
        assert_eq!((merged[0].start, merged[0].end), (3, 20));
        assert_eq!(merged[0].sse_type, SseType::MixedHelix);
        assert_eq!(merged[0].label.as_deref(), Some("G0+H1"));
        assert_eq!(merged[0].nested.len(), 2);
        assert_eq!(merged[1].label.as_deref(), Some("H2"));
        assert_eq!(merged[2].chain_id, "B");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn helix_ending_at_the_last_residue_is_kept() {
        let residues = contiguous_chain(12);
        let backbone = BackboneIndex::new(&residues).unwrap();
        let bonds = BondIndex::from_pairs(12, (6..=8).map(|i| (i + 3, i)));
        let mut config = AssignmentConfig::default().helices;
        config.helices_by_alpha = false;
        let detector = HelixDetector::new(&backbone, &bonds, &config);

        let helices = detector.helices_of_pitch(3, SseType::HelixG);

        assert_eq!(helices.len(), 1);
        assert_eq!((helices[0].start, helices[0].end), (7, 12));
    }
}
