use nalgebra::{Point3, Unit};

/// Length of the N-H bond placed by [`dssp_amide_hydrogen`], in angstroms.
pub const DSSP_NH_BOND_LENGTH: f64 = 1.0;

/// Places the amide hydrogen the way DSSP does: along the direction of the
/// preceding residue's carbonyl, pointing from O to C.
///
/// Returns `None` if the preceding C and O coincide.
pub fn dssp_amide_hydrogen(
    n_pos: &Point3<f64>,
    prev_c_pos: &Point3<f64>,
    prev_o_pos: &Point3<f64>,
) -> Option<Point3<f64>> {
    let direction = Unit::try_new(prev_c_pos - prev_o_pos, f64::EPSILON)?;
    Some(n_pos + direction.into_inner() * DSSP_NH_BOND_LENGTH)
}

#[cfg(test)]
pub(crate) mod test_support {
    use nalgebra::{Point3, Unit, Vector3};

    /// Places an atom from three reference atoms by the natural extension
    /// reference frame method: bond length to `c`, bond angle `b-c-new` and
    /// dihedral `a-b-c-new` (angles in degrees).
    pub fn place_by_internal_coordinates(
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
        bond_length: f64,
        angle_degrees: f64,
        dihedral_degrees: f64,
    ) -> Option<Point3<f64>> {
        let bc = Unit::try_new(c - b, f64::EPSILON)?;
        let n = Unit::try_new((b - a).cross(&bc), f64::EPSILON)?;
        let m = n.cross(&bc);

        let angle = angle_degrees.to_radians();
        let dihedral = dihedral_degrees.to_radians();
        let d2 = Vector3::new(
            -bond_length * angle.cos(),
            bond_length * angle.sin() * dihedral.cos(),
            bond_length * angle.sin() * dihedral.sin(),
        );

        let offset = bc.into_inner() * d2.x + m * d2.y + n.into_inner() * d2.z;
        Some(c + offset)
    }
}
