use super::HBondFinder;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A single backbone hydrogen bond, N-H of `donor` to C=O of `acceptor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HBond {
    pub donor: usize,
    pub acceptor: usize,
}

/// Materialized bond set of one assignment run.
///
/// Partner lists are sorted ascending; membership tests are O(1).
#[derive(Debug, Clone, Default)]
pub struct BondIndex {
    acceptors: Vec<Vec<usize>>,
    donors: Vec<Vec<usize>>,
    bonds: HashSet<(usize, usize)>,
}

impl BondIndex {
    #[cfg(not(feature = "parallel"))]
    pub fn build<F: HBondFinder>(finder: &F) -> Self {
        let n = finder.backbone().len();
        let acceptors: Vec<Vec<usize>> = (0..n).map(|d| finder.find_acceptors(d)).collect();
        Self::from_acceptor_lists(acceptors)
    }

    #[cfg(feature = "parallel")]
    pub fn build<F: HBondFinder + Sync>(finder: &F) -> Self {
        let n = finder.backbone().len();
        let acceptors: Vec<Vec<usize>> = (0..n)
            .into_par_iter()
            .map(|d| finder.find_acceptors(d))
            .collect();
        Self::from_acceptor_lists(acceptors)
    }

    /// Builds the index from explicit `(donor, acceptor)` pairs over `residue_count` residues.
    pub fn from_pairs(residue_count: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut acceptors = vec![Vec::new(); residue_count];
        for (donor, acceptor) in pairs {
            acceptors[donor].push(acceptor);
        }
        for list in &mut acceptors {
            list.sort_unstable();
            list.dedup();
        }
        Self::from_acceptor_lists(acceptors)
    }

    fn from_acceptor_lists(acceptors: Vec<Vec<usize>>) -> Self {
        let mut donors = vec![Vec::new(); acceptors.len()];
        let mut bonds = HashSet::new();
        // Donors are visited in ascending order, so every donor list ends up sorted.
        for (donor, list) in acceptors.iter().enumerate() {
            for &acceptor in list {
                donors[acceptor].push(donor);
                bonds.insert((donor, acceptor));
            }
        }
        debug!(
            residues = acceptors.len(),
            bonds = bonds.len(),
            "Indexed backbone hydrogen bonds."
        );
        Self {
            acceptors,
            donors,
            bonds,
        }
    }

    pub fn is_hbond(&self, donor: usize, acceptor: usize) -> bool {
        self.bonds.contains(&(donor, acceptor))
    }

    /// Like [`is_hbond`](Self::is_hbond) for residue indices that may not exist.
    pub fn is_hbond_between(&self, donor: Option<usize>, acceptor: Option<usize>) -> bool {
        matches!((donor, acceptor), (Some(d), Some(a)) if self.is_hbond(d, a))
    }

    pub fn acceptors_of(&self, donor: usize) -> &[usize] {
        &self.acceptors[donor]
    }

    pub fn donors_of(&self, acceptor: usize) -> &[usize] {
        &self.donors[acceptor]
    }

    pub fn residue_count(&self) -> usize {
        self.acceptors.len()
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// All bonds ordered by donor, then acceptor.
    pub fn iter(&self) -> impl Iterator<Item = HBond> + '_ {
        self.acceptors
            .iter()
            .enumerate()
            .flat_map(|(donor, list)| list.iter().map(move |&acceptor| HBond { donor, acceptor }))
    }
}
