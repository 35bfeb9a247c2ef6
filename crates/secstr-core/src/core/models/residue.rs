use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackboneAtom {
    N,  // Amide nitrogen
    H,  // Amide hydrogen
    CA, // Alpha carbon
    C,  // Carbonyl carbon
    O,  // Carbonyl oxygen
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Not a backbone atom name: '{0}'")]
pub struct ParseBackboneAtomError(pub String);

impl FromStr for BackboneAtom {
    type Err = ParseBackboneAtomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "N" => Ok(BackboneAtom::N),
            "H" | "HN" => Ok(BackboneAtom::H),
            "CA" => Ok(BackboneAtom::CA),
            "C" => Ok(BackboneAtom::C),
            "O" => Ok(BackboneAtom::O),
            _ => Err(ParseBackboneAtomError(s.to_string())),
        }
    }
}

impl fmt::Display for BackboneAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackboneAtom::N => "N",
            BackboneAtom::H => "H",
            BackboneAtom::CA => "CA",
            BackboneAtom::C => "C",
            BackboneAtom::O => "O",
        };
        f.write_str(name)
    }
}

/// The five backbone atom slots used by hydrogen-bond detection.
///
/// Every slot is independently optional; an absent atom is never encoded as a
/// placeholder coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BackboneAtoms {
    pub n: Option<Point3<f64>>,
    pub h: Option<Point3<f64>>,
    pub ca: Option<Point3<f64>>,
    pub c: Option<Point3<f64>>,
    pub o: Option<Point3<f64>>,
}

impl BackboneAtoms {
    pub fn get(&self, atom: BackboneAtom) -> Option<Point3<f64>> {
        match atom {
            BackboneAtom::N => self.n,
            BackboneAtom::H => self.h,
            BackboneAtom::CA => self.ca,
            BackboneAtom::C => self.c,
            BackboneAtom::O => self.o,
        }
    }

    pub fn set(&mut self, atom: BackboneAtom, position: Option<Point3<f64>>) {
        let slot = match atom {
            BackboneAtom::N => &mut self.n,
            BackboneAtom::H => &mut self.h,
            BackboneAtom::CA => &mut self.ca,
            BackboneAtom::C => &mut self.c,
            BackboneAtom::O => &mut self.o,
        };
        *slot = position;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub chain_id: String,       // Chain identifier from the source structure
    pub seq_number: isize,      // Residue sequence number
    pub name: String,           // Three-letter residue name (e.g., "ALA", "PRO")
    pub atoms: BackboneAtoms,   // Backbone atom coordinates
}

impl Residue {
    pub fn new(chain_id: &str, seq_number: isize, name: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            seq_number,
            name: name.to_string(),
            atoms: BackboneAtoms::default(),
        }
    }

    pub fn with_atom(mut self, atom: BackboneAtom, position: Point3<f64>) -> Self {
        self.atoms.set(atom, Some(position));
        self
    }

    pub fn is_proline(&self) -> bool {
        self.name.eq_ignore_ascii_case("PRO")
    }

    /// Whether `other` directly follows this residue in the same chain.
    pub fn is_followed_by(&self, other: &Residue) -> bool {
        self.chain_id == other.chain_id && self.seq_number + 1 == other.seq_number
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.name, self.chain_id, self.seq_number)
    }
}
