use super::HBondFinder;
use super::backbone::BackboneIndex;
use itertools::iproduct;
use nalgebra::Point3;
use std::collections::HashMap;
use tracing::debug;

/// Edge length of a grid cell in angstroms. Bonded residues have their alpha
/// carbons well within this distance, so the 3x3x3 neighbourhood of a cell
/// holds every possible partner.
pub const GRID_CELL_SIZE: f64 = 10.0;

type CellKey = (i64, i64, i64);

/// Sparse uniform grid over alpha-carbon positions, anchored at the minimum
/// corner of their bounding box.
#[derive(Debug, Clone)]
pub struct GridFinder<'a> {
    backbone: &'a BackboneIndex<'a>,
    energy_cutoff: f64,
    origin: Point3<f64>,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl<'a> GridFinder<'a> {
    pub fn new(backbone: &'a BackboneIndex<'a>, energy_cutoff: f64) -> Self {
        let origin = backbone
            .alpha_carbons()
            .iter()
            .fold(None::<Point3<f64>>, |acc, p| {
                Some(acc.map_or(*p, |min| min.inf(p)))
            })
            .unwrap_or_else(Point3::origin);

        let mut finder = Self {
            backbone,
            energy_cutoff,
            origin,
            cells: HashMap::new(),
        };
        for (index, ca) in backbone.alpha_carbons().iter().enumerate() {
            let key = finder.cell_of(ca);
            finder.cells.entry(key).or_default().push(index);
        }
        debug!(
            residues = backbone.len(),
            occupied_cells = finder.cells.len(),
            "Built alpha-carbon grid."
        );
        finder
    }

    fn cell_of(&self, position: &Point3<f64>) -> CellKey {
        let offset = (position - self.origin) / GRID_CELL_SIZE;
        (
            offset.x.floor() as i64,
            offset.y.floor() as i64,
            offset.z.floor() as i64,
        )
    }

    /// Residues in the cells adjacent to (or equal to) the cell of `index`, ascending.
    fn neighbours(&self, index: usize) -> Vec<usize> {
        let (x, y, z) = self.cell_of(self.backbone.alpha_carbon(index));
        let mut found: Vec<usize> = iproduct!(-1..=1, -1..=1, -1..=1)
            .filter_map(|(dx, dy, dz)| self.cells.get(&(x + dx, y + dy, z + dz)))
            .flatten()
            .copied()
            .collect();
        found.sort_unstable();
        found
    }
}

impl HBondFinder for GridFinder<'_> {
    fn backbone(&self) -> &BackboneIndex<'_> {
        self.backbone
    }

    fn energy_cutoff(&self) -> f64 {
        self.energy_cutoff
    }

    fn find_acceptors(&self, donor: usize) -> Vec<usize> {
        self.neighbours(donor)
            .into_iter()
            .filter(|&acceptor| self.is_hbond(donor, acceptor))
            .collect()
    }

    fn find_donors(&self, acceptor: usize) -> Vec<usize> {
        self.neighbours(acceptor)
            .into_iter()
            .filter(|&donor| self.is_hbond(donor, acceptor))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hbonds::backbone::test_support::chain_of;

    #[test]
    fn cells_are_keyed_relative_to_minimum_corner() {
        let residues = chain_of("A", [-2, 0, 1, 3]); // x = -7.6, 0.0, 3.8, 11.4
        let backbone = BackboneIndex::new(&residues).unwrap();
        let grid = GridFinder::new(&backbone, -0.5);

        assert_eq!(grid.origin, Point3::new(-7.6, 0.0, 0.0));
        assert_eq!(grid.cell_of(backbone.alpha_carbon(0)), (0, 0, 0));
        assert_eq!(grid.cell_of(backbone.alpha_carbon(2)), (1, 0, 0));
        assert_eq!(grid.cell_of(backbone.alpha_carbon(3)), (1, 0, 0));
    }

    #[test]
    fn neighbours_skip_cells_two_steps_away() {
        let residues = chain_of("A", [0, 3, 6]); // x = 0.0, 11.4, 22.8
        let backbone = BackboneIndex::new(&residues).unwrap();
        let grid = GridFinder::new(&backbone, -0.5);

        assert_eq!(grid.neighbours(0), vec![0, 1]);
        assert_eq!(grid.neighbours(1), vec![0, 1, 2]);
        assert_eq!(grid.neighbours(2), vec![1, 2]);
    }
}
