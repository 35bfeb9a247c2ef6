use crate::core::models::residue::Residue;
use crate::engine::error::AssignError;
use nalgebra::Point3;

/// Positional view over the residues of one assignment run.
///
/// Residues are addressed by their index in the input slice. Every residue is
/// guaranteed to have an alpha carbon.
#[derive(Debug, Clone)]
pub struct BackboneIndex<'a> {
    residues: &'a [Residue],
    alpha_carbons: Vec<Point3<f64>>,
}

impl<'a> BackboneIndex<'a> {
    pub fn new(residues: &'a [Residue]) -> Result<Self, AssignError> {
        let alpha_carbons = residues
            .iter()
            .map(|r| {
                r.atoms.ca.ok_or_else(|| AssignError::MissingAlphaCarbon {
                    residue: r.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            residues,
            alpha_carbons,
        })
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residues(&self) -> &'a [Residue] {
        self.residues
    }

    pub fn residue(&self, index: usize) -> &'a Residue {
        &self.residues[index]
    }

    pub fn alpha_carbon(&self, index: usize) -> &Point3<f64> {
        &self.alpha_carbons[index]
    }

    pub fn alpha_carbons(&self) -> &[Point3<f64>] {
        &self.alpha_carbons
    }

    pub fn chain_id(&self, index: usize) -> &'a str {
        &self.residues[index].chain_id
    }

    pub fn seq_number(&self, index: usize) -> isize {
        self.residues[index].seq_number
    }

    pub fn same_chain(&self, i: usize, j: usize) -> bool {
        self.chain_id(i) == self.chain_id(j)
    }

    /// Same chain and at most one residue apart in sequence numbering; such
    /// pairs never form a hydrogen bond.
    pub fn are_too_close(&self, i: usize, j: usize) -> bool {
        self.same_chain(i, j) && (self.seq_number(i) - self.seq_number(j)).abs() <= 1
    }

    /// Index of the residue `x` positions after `index`, if it continues the
    /// same chain without a numbering gap.
    pub fn residue_after(&self, index: usize, x: usize) -> Option<usize> {
        let candidate = index.checked_add(x)?;
        self.follows_at(index, candidate, x as isize)
    }

    /// Index of the residue `x` positions before `index`, if it continues the
    /// same chain without a numbering gap.
    pub fn residue_before(&self, index: usize, x: usize) -> Option<usize> {
        let candidate = index.checked_sub(x)?;
        self.follows_at(index, candidate, -(x as isize))
    }

    fn follows_at(&self, index: usize, candidate: usize, offset: isize) -> Option<usize> {
        (candidate < self.len()
            && self.same_chain(index, candidate)
            && self.seq_number(candidate) == self.seq_number(index) + offset)
            .then_some(candidate)
    }
}
