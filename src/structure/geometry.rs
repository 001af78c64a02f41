//! Centroid, centring and bounding radius.

use glam::DVec3;

use super::elements;
use super::{Atom, RADIUS_SCALE};

/// Extent of an impostor cube of radius `r` measured corner to centre.
fn bloat(radius: f64) -> f64 {
    RADIUS_SCALE * 3.0_f64.sqrt() * radius
}

/// Arithmetic mean of the atom positions. `None` when there are no atoms.
#[must_use]
pub fn centroid(atoms: &[Atom]) -> Option<DVec3> {
    if atoms.is_empty() {
        return None;
    }
    let sum: DVec3 = atoms.iter().map(|a| a.position).sum();
    Some(sum / atoms.len() as f64)
}

/// Translate `atoms` so their centroid sits at the origin.
pub fn center(atoms: &mut [Atom]) {
    let Some(c) = centroid(atoms) else {
        return;
    };
    for atom in atoms {
        atom.position -= c;
    }
}

/// The atom whose impostor reaches furthest from the origin.
///
/// Atoms of unknown elements are not considered; if none are known the
/// first atom is returned.
#[must_use]
pub fn far_atom(atoms: &[Atom]) -> Option<&Atom> {
    let mut best = atoms.first()?;
    let mut best_reach = 0.0;
    for atom in atoms {
        let Some(e) = elements::lookup(&atom.symbol) else {
            continue;
        };
        let reach = atom.position.length() + bloat(e.radius);
        if reach > best_reach {
            best_reach = reach;
            best = atom;
        }
    }
    Some(best)
}

/// Radius of the origin-centred sphere enclosing every atom impostor.
///
/// Uses the distance of [`far_atom`] padded by the largest radius in the
/// element table, so any element placed there would still fit.
#[must_use]
pub fn bounding_radius(atoms: &[Atom]) -> f64 {
    let distance = far_atom(atoms).map_or(0.0, |a| a.position.length());
    distance + bloat(elements::max_radius())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_pair() {
        let atoms = vec![Atom::new("O", 0.0, 0.0, 0.0), Atom::new("H", 1.0, 0.0, 0.0)];
        assert_eq!(centroid(&atoms), Some(DVec3::new(0.5, 0.0, 0.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn center_moves_centroid_to_origin() {
        let mut atoms = vec![
            Atom::new("C", 3.0, -1.0, 7.0),
            Atom::new("C", 4.5, 2.0, 6.0),
            Atom::new("N", -0.25, 0.5, 9.0),
        ];
        center(&mut atoms);
        let c = centroid(&atoms).unwrap();
        assert!(c.length() < 1e-12);
    }

    #[test]
    fn far_atom_accounts_for_radius() {
        // H is slightly further out but C's larger radius reaches further.
        let atoms = vec![Atom::new("H", 1.1, 0.0, 0.0), Atom::new("C", -1.0, 0.0, 0.0)];
        assert_eq!(far_atom(&atoms).unwrap().symbol, "C");
    }

    #[test]
    fn far_atom_skips_unknown_elements() {
        let atoms = vec![Atom::new("C", 0.0, 0.0, 0.0), Atom::new("Zz", 50.0, 0.0, 0.0)];
        assert_eq!(far_atom(&atoms).unwrap().symbol, "C");
    }

    #[test]
    fn bounding_radius_pads_with_largest_element() {
        let atoms = vec![Atom::new("O", 2.0, 0.0, 0.0), Atom::new("H", -2.0, 0.0, 0.0)];
        let expected = 2.0 + RADIUS_SCALE * 3.0_f64.sqrt() * elements::max_radius();
        assert!((bounding_radius(&atoms) - expected).abs() < 1e-12);
    }
}
