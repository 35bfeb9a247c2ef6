use crate::core::models::residue::BackboneAtoms;
use nalgebra::distance;

/// Product of the partial charges placed on the C=O and N-H dipoles.
pub const PARTIAL_CHARGE_PRODUCT: f64 = 0.42 * 0.20;
/// Electrostatic conversion factor, kcal·Å/(mol·e²).
pub const COULOMB_FACTOR: f64 = 332.0;

/// DSSP electrostatic energy (kcal/mol) of the bond from the N-H of `donor`
/// to the C=O of `acceptor`.
///
/// Undefined when the donor lacks N or H, or the acceptor lacks C or O.
pub fn hbond_energy(donor: &BackboneAtoms, acceptor: &BackboneAtoms) -> Option<f64> {
    let (n, h) = (donor.n?, donor.h?);
    let (c, o) = (acceptor.c?, acceptor.o?);

    let r_on = distance(&o, &n);
    let r_ch = distance(&c, &h);
    let r_oh = distance(&o, &h);
    let r_cn = distance(&c, &n);

    Some(PARTIAL_CHARGE_PRODUCT * COULOMB_FACTOR * (1.0 / r_on + 1.0 / r_ch - 1.0 / r_oh - 1.0 / r_cn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn linear_pair() -> (BackboneAtoms, BackboneAtoms) {
        // N-H ... O=C along the x axis, H...O at 2.0 Å.
        let donor = BackboneAtoms {
            n: Some(Point3::new(0.0, 0.0, 0.0)),
            h: Some(Point3::new(1.0, 0.0, 0.0)),
            ..Default::default()
        };
        let acceptor = BackboneAtoms {
            o: Some(Point3::new(3.0, 0.0, 0.0)),
            c: Some(Point3::new(4.23, 0.0, 0.0)),
            ..Default::default()
        };
        (donor, acceptor)
    }

    #[test]
    fn linear_geometry_gives_expected_energy() {
        let (donor, acceptor) = linear_pair();
        let expected = 0.084 * 332.0 * (1.0 / 3.0 + 1.0 / 3.23 - 1.0 / 2.0 - 1.0 / 4.23);
        let energy = hbond_energy(&donor, &acceptor).unwrap();
        assert!(f64_approx_equal(energy, expected));
        assert!(energy < -0.5);
    }

    #[test]
    fn missing_atoms_make_energy_undefined() {
        let (mut donor, acceptor) = linear_pair();
        donor.h = None;
        assert!(hbond_energy(&donor, &acceptor).is_none());

        let (donor, mut acceptor) = linear_pair();
        acceptor.o = None;
        assert!(hbond_energy(&donor, &acceptor).is_none());
    }
}
