use super::traits::BackboneFile;
use crate::core::models::residue::{BackboneAtom, Residue};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum BackboneCsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Residue {chain_id}{seq_number} is listed as both '{first}' and '{second}'")]
    ConflictingResidueName {
        chain_id: String,
        seq_number: isize,
        first: String,
        second: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct AtomRecord {
    chain: String,
    seq: isize,
    name: String,
    atom: String,
    x: f64,
    y: f64,
    z: f64,
}

/// Headered CSV with one backbone atom per row: `chain,seq,name,atom,x,y,z`.
///
/// Rows naming atoms other than N, H, CA, C and O are skipped.
pub struct BackboneCsvFile;

impl BackboneFile for BackboneCsvFile {
    type Error = BackboneCsvError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Residue>, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut residues: Vec<Residue> = Vec::new();
        let mut index_by_key: HashMap<(String, isize), usize> = HashMap::new();
        let mut skipped = 0usize;

        for record in csv_reader.deserialize::<AtomRecord>() {
            let record = record?;
            let Ok(atom) = record.atom.parse::<BackboneAtom>() else {
                trace!(atom = %record.atom, "Skipping non-backbone atom row.");
                skipped += 1;
                continue;
            };

            let key = (record.chain.clone(), record.seq);
            let index = match index_by_key.get(&key) {
                Some(&index) => index,
                None => {
                    residues.push(Residue::new(&record.chain, record.seq, &record.name));
                    index_by_key.insert(key, residues.len() - 1);
                    residues.len() - 1
                }
            };

            let residue = &mut residues[index];
            if residue.name != record.name {
                return Err(BackboneCsvError::ConflictingResidueName {
                    chain_id: record.chain,
                    seq_number: record.seq,
                    first: residue.name.clone(),
                    second: record.name,
                });
            }
            residue
                .atoms
                .set(atom, Some(Point3::new(record.x, record.y, record.z)));
        }

        debug!(
            residues = residues.len(),
            skipped_rows = skipped,
            "Read backbone CSV."
        );
        Ok(residues)
    }

    fn write_to(residues: &[Residue], writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for residue in residues {
            for atom in [
                BackboneAtom::N,
                BackboneAtom::H,
                BackboneAtom::CA,
                BackboneAtom::C,
                BackboneAtom::O,
            ] {
                let Some(position) = residue.atoms.get(atom) else {
                    continue;
                };
                csv_writer.serialize(AtomRecord {
                    chain: residue.chain_id.clone(),
                    seq: residue.seq_number,
                    name: residue.name.clone(),
                    atom: atom.to_string(),
                    x: position.x,
                    y: position.y,
                    z: position.z,
                })?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
chain,seq,name,atom,x,y,z
A,1,GLY,N,0.0,0.0,0.0
A,1,GLY,CA,1.458,0.0,0.0
A,1,GLY,CB,9.0,9.0,9.0
A,1,GLY,C,2.0,1.4,0.0
A,2,PRO,N,3.3,1.5,0.0
B,1,ALA, CA ,10.0,0.0,0.0
";

    #[test]
    fn read_groups_atoms_into_residues_in_order_of_appearance() {
        let residues = BackboneCsvFile::read_from(&mut Cursor::new(SAMPLE)).unwrap();

        assert_eq!(residues.len(), 3);
        assert_eq!(residues[0].name, "GLY");
        assert_eq!(residues[0].atoms.ca, Some(Point3::new(1.458, 0.0, 0.0)));
        assert_eq!(residues[0].atoms.o, None);
        assert_eq!((residues[1].chain_id.as_str(), residues[1].seq_number), ("A", 2));
        assert_eq!(residues[2].atoms.ca, Some(Point3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn read_fails_on_conflicting_residue_names() {
        let input = "chain,seq,name,atom,x,y,z\nA,1,GLY,N,0,0,0\nA,1,ALA,CA,1,0,0\n";
        let result = BackboneCsvFile::read_from(&mut Cursor::new(input));
        assert!(matches!(
            result,
            Err(BackboneCsvError::ConflictingResidueName { seq_number: 1, .. })
        ));
    }

    #[test]
    fn read_fails_on_malformed_coordinates() {
        let input = "chain,seq,name,atom,x,y,z\nA,1,GLY,N,zero,0,0\n";
        let result = BackboneCsvFile::read_from(&mut Cursor::new(input));
        assert!(matches!(result, Err(BackboneCsvError::Csv(_))));
    }

    #[test]
    fn written_file_can_be_read_back_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backbone.csv");
        let residues = BackboneCsvFile::read_from(&mut Cursor::new(SAMPLE)).unwrap();

        BackboneCsvFile::write_to_path(&residues, &path).unwrap();
        let reread = BackboneCsvFile::read_from_path(&path).unwrap();

        assert_eq!(reread, residues);
    }
}
