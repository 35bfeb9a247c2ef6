use crate::core::models::residue::Residue;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface of the backbone coordinate formats.
pub trait BackboneFile {
    type Error: Error + From<io::Error>;

    /// Reads residues in the order in which they first appear in the input.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Residue>, Self::Error>;

    fn write_to(residues: &[Residue], writer: &mut impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Residue>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(residues: &[Residue], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(residues, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
