use super::HBondFinder;
use super::backbone::BackboneIndex;

/// Tests every residue pair; quadratic in the number of residues.
#[derive(Debug, Clone)]
pub struct ExhaustiveFinder<'a> {
    backbone: &'a BackboneIndex<'a>,
    energy_cutoff: f64,
}

impl<'a> ExhaustiveFinder<'a> {
    pub fn new(backbone: &'a BackboneIndex<'a>, energy_cutoff: f64) -> Self {
        Self {
            backbone,
            energy_cutoff,
        }
    }
}

impl HBondFinder for ExhaustiveFinder<'_> {
    fn backbone(&self) -> &BackboneIndex<'_> {
        self.backbone
    }

    fn energy_cutoff(&self) -> f64 {
        self.energy_cutoff
    }

    fn find_acceptors(&self, donor: usize) -> Vec<usize> {
        (0..self.backbone.len())
            .filter(|&acceptor| self.is_hbond(donor, acceptor))
            .collect()
    }

    fn find_donors(&self, acceptor: usize) -> Vec<usize> {
        (0..self.backbone.len())
            .filter(|&donor| self.is_hbond(donor, acceptor))
            .collect()
    }
}
