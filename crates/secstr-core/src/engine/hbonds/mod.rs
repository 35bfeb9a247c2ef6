//! # Hydrogen Bond Detection
//!
//! Backbone hydrogen bonds are detected with the DSSP electrostatic model: the
//! N-H group of a donor residue and the C=O group of an acceptor residue are
//! treated as two dipoles, and the pair is bonded when their interaction
//! energy falls at or below a cutoff (default -0.5 kcal/mol).
//!
//! ## Strategies
//!
//! - [`ExhaustiveFinder`] tests every residue pair.
//! - [`GridFinder`] hashes alpha carbons into 10 Å cells and tests only pairs
//!   from neighbouring cells. It returns exactly the bonds the exhaustive
//!   finder returns.
//!
//! The strategy is fixed when the [`HBondOracle`] is constructed. The finished
//! bond set is materialized once into a [`BondIndex`], which is what the ladder
//! and helix detectors query.

pub mod backbone;
pub mod bond_index;
pub mod energy;
pub mod exhaustive;
pub mod grid;

pub use backbone::BackboneIndex;
pub use bond_index::BondIndex;
pub use exhaustive::ExhaustiveFinder;
pub use grid::GridFinder;

use crate::engine::config::{HBondConfig, HBondStrategy};

pub trait HBondFinder {
    fn backbone(&self) -> &BackboneIndex<'_>;

    fn energy_cutoff(&self) -> f64;

    /// Acceptors bonded to the N-H of `donor`, ascending.
    fn find_acceptors(&self, donor: usize) -> Vec<usize>;

    /// Donors bonded to the C=O of `acceptor`, ascending.
    fn find_donors(&self, acceptor: usize) -> Vec<usize>;

    fn energy(&self, donor: usize, acceptor: usize) -> Option<f64> {
        let backbone = self.backbone();
        energy::hbond_energy(
            &backbone.residue(donor).atoms,
            &backbone.residue(acceptor).atoms,
        )
    }

    fn is_hbond(&self, donor: usize, acceptor: usize) -> bool {
        !self.backbone().are_too_close(donor, acceptor)
            && self
                .energy(donor, acceptor)
                .is_some_and(|e| e <= self.energy_cutoff())
    }
}

#[derive(Debug, Clone)]
pub enum HBondOracle<'a> {
    Exhaustive(ExhaustiveFinder<'a>),
    Grid(GridFinder<'a>),
}

impl<'a> HBondOracle<'a> {
    pub fn new(backbone: &'a BackboneIndex<'a>, config: &HBondConfig) -> Self {
        match config.strategy {
            HBondStrategy::Exhaustive => {
                HBondOracle::Exhaustive(ExhaustiveFinder::new(backbone, config.energy_cutoff))
            }
            HBondStrategy::Grid => {
                HBondOracle::Grid(GridFinder::new(backbone, config.energy_cutoff))
            }
        }
    }

    pub fn strategy(&self) -> HBondStrategy {
        match self {
            HBondOracle::Exhaustive(_) => HBondStrategy::Exhaustive,
            HBondOracle::Grid(_) => HBondStrategy::Grid,
        }
    }
}

impl HBondFinder for HBondOracle<'_> {
    fn backbone(&self) -> &BackboneIndex<'_> {
        match self {
            HBondOracle::Exhaustive(f) => f.backbone(),
            HBondOracle::Grid(f) => f.backbone(),
        }
    }

    fn energy_cutoff(&self) -> f64 {
        match self {
            HBondOracle::Exhaustive(f) => f.energy_cutoff(),
            HBondOracle::Grid(f) => f.energy_cutoff(),
        }
    }

    fn find_acceptors(&self, donor: usize) -> Vec<usize> {
        match self {
            HBondOracle::Exhaustive(f) => f.find_acceptors(donor),
            HBondOracle::Grid(f) => f.find_acceptors(donor),
        }
    }

    fn find_donors(&self, acceptor: usize) -> Vec<usize> {
        match self {
            HBondOracle::Exhaustive(f) => f.find_donors(acceptor),
            HBondOracle::Grid(f) => f.find_donors(acceptor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::{BackboneAtom, Residue};
    use nalgebra::{Point3, Rotation3, Vector3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Rigid backbone template centred on the alpha carbon.
    const TEMPLATE: [(BackboneAtom, [f64; 3]); 5] = [
        (BackboneAtom::N, [-0.525, 1.363, 0.0]),
        (BackboneAtom::H, [-1.5, 1.58, 0.0]),
        (BackboneAtom::CA, [0.0, 0.0, 0.0]),
        (BackboneAtom::C, [1.526, 0.0, 0.0]),
        (BackboneAtom::O, [2.153, -1.062, 0.0]),
    ];

    fn random_residues(seed: u64, count: usize, box_size: f64) -> Vec<Residue> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|i| {
                let rotation = Rotation3::from_euler_angles(
                    rng.gen_range(0.0..std::f64::consts::TAU),
                    rng.gen_range(0.0..std::f64::consts::TAU),
                    rng.gen_range(0.0..std::f64::consts::TAU),
                );
                let centre = Vector3::new(
                    rng.gen_range(0.0..box_size),
                    rng.gen_range(0.0..box_size),
                    rng.gen_range(0.0..box_size),
                );
                let chain = if rng.gen_bool(0.5) { "A" } else { "B" };
                let mut residue = Residue::new(chain, i as isize, "GLY");
                for (atom, [x, y, z]) in TEMPLATE {
                    let position = rotation * Point3::new(x, y, z) + centre;
                    residue.atoms.set(atom, Some(position));
                }
                residue
            })
            .collect()
    }

    fn exhaustive_and_grid_agree(residues: &[Residue]) -> usize {
        let backbone = BackboneIndex::new(residues).unwrap();
        let exhaustive = ExhaustiveFinder::new(&backbone, -0.5);
        let grid = GridFinder::new(&backbone, -0.5);

        let mut bonds = 0;
        for i in 0..backbone.len() {
            let acceptors = exhaustive.find_acceptors(i);
            assert_eq!(acceptors, grid.find_acceptors(i), "acceptors of {i}");
            assert_eq!(exhaustive.find_donors(i), grid.find_donors(i), "donors of {i}");
            bonds += acceptors.len();
        }
        bonds
    }

    #[test]
    fn grid_and_exhaustive_agree_on_random_dense_sets() {
        let mut total_bonds = 0;
        for seed in 0..5 {
            let residues = random_residues(seed, 400, 35.0);
            total_bonds += exhaustive_and_grid_agree(&residues);
        }
        assert!(total_bonds > 0, "random sets should contain some bonds");
    }

    #[test]
    fn grid_and_exhaustive_agree_on_sparse_sets_spanning_many_cells() {
        for seed in 10..13 {
            let residues = random_residues(seed, 150, 120.0);
            exhaustive_and_grid_agree(&residues);
        }
    }

    #[test]
    fn sequence_neighbours_never_bond() {
        // Two residues placed in an ideal bonding geometry, N-H...O=C collinear.
        let donor = Residue::new("A", 5, "ALA")
            .with_atom(BackboneAtom::N, Point3::new(0.0, 0.0, 0.0))
            .with_atom(BackboneAtom::H, Point3::new(1.0, 0.0, 0.0))
            .with_atom(BackboneAtom::CA, Point3::new(-1.0, 1.0, 0.0));
        let acceptor = Residue::new("A", 6, "ALA")
            .with_atom(BackboneAtom::O, Point3::new(3.0, 0.0, 0.0))
            .with_atom(BackboneAtom::C, Point3::new(4.23, 0.0, 0.0))
            .with_atom(BackboneAtom::CA, Point3::new(5.0, 1.0, 0.0));

        let adjacent = vec![donor.clone(), acceptor.clone()];
        let backbone = BackboneIndex::new(&adjacent).unwrap();
        let oracle = HBondOracle::new(
            &backbone,
            &HBondConfig {
                energy_cutoff: -0.5,
                strategy: HBondStrategy::Exhaustive,
            },
        );
        assert!(oracle.energy(0, 1).unwrap() < -0.5);
        assert!(!oracle.is_hbond(0, 1));

        let mut distant_acceptor = acceptor;
        distant_acceptor.chain_id = "B".to_string();
        let separate_chains = vec![donor, distant_acceptor];
        let backbone = BackboneIndex::new(&separate_chains).unwrap();
        let oracle = HBondOracle::new(
            &backbone,
            &HBondConfig {
                energy_cutoff: -0.5,
                strategy: HBondStrategy::Grid,
            },
        );
        assert_eq!(oracle.strategy(), HBondStrategy::Grid);
        assert!(oracle.is_hbond(0, 1));
        assert_eq!(oracle.find_acceptors(0), vec![1]);
        assert_eq!(oracle.find_donors(1), vec![0]);
    }
}
