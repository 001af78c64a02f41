//! Distance-based bond detection.
//!
//! Candidate pairs are found with a sweep along z: atoms are sorted by z
//! and each atom only tests partners inside a window as wide as the
//! largest possible bond. Bonding itself is a loose covalent test; the
//! renderer later filters by [`Bond::cutoff`] against a user threshold.

use super::elements::{self, Element};
use super::{Atom, Bond, RADIUS_SCALE};

/// Every pair closer than `RADIUS_SCALE · (r_a + r_b)`, sorted ascending
/// by cutoff. Pairs involving unknown elements are skipped.
#[must_use]
pub fn detect(atoms: &[Atom]) -> Vec<Bond> {
    let mut sorted: Vec<(&Atom, Option<&'static Element>)> = atoms
        .iter()
        .map(|a| (a, elements::lookup(&a.symbol)))
        .collect();
    sorted.sort_by(|(a, _), (b, _)| a.position.z.total_cmp(&b.position.z));

    let window = RADIUS_SCALE * 2.0 * elements::max_radius();
    let mut bonds = Vec::new();

    for (i, &(a, ea)) in sorted.iter().enumerate() {
        let Some(ea) = ea else {
            continue;
        };
        let z_limit = a.position.z + window;
        for &(b, eb) in &sorted[i + 1..] {
            if b.position.z >= z_limit {
                break;
            }
            let Some(eb) = eb else {
                continue;
            };
            let distance = a.position.distance(b.position);
            if distance < RADIUS_SCALE * (ea.radius + eb.radius) {
                bonds.push(Bond {
                    pos_a: a.position,
                    pos_b: b.position,
                    rad_a: ea.radius,
                    rad_b: eb.radius,
                    col_a: ea.color(),
                    col_b: eb.color(),
                    cutoff: distance / (ea.radius + eb.radius),
                });
            }
        }
    }

    bonds.sort_by(|a, b| a.cutoff.total_cmp(&b.cutoff));
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(symbol: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(symbol, x, y, z)
    }

    #[test]
    fn oxygen_hydrogen_pair() {
        let bonds = detect(&[atom("O", 0.0, 0.0, 0.0), atom("H", 1.0, 0.0, 0.0)]);
        assert_eq!(bonds.len(), 1);
        let b = &bonds[0];
        assert!((b.cutoff - 1.0 / 0.97).abs() < 1e-12);
        assert!((b.rad_a + b.rad_b - 0.97).abs() < 1e-12);
    }

    #[test]
    fn distant_pair_is_not_bonded() {
        // 2.5 · (0.31 + 0.31) = 1.55
        let bonds = detect(&[atom("H", 0.0, 0.0, 0.0), atom("H", 0.0, 1.6, 0.0)]);
        assert!(bonds.is_empty());
    }

    #[test]
    fn pair_at_cutoff_is_not_bonded() {
        let d = RADIUS_SCALE * (0.31 + 0.31);
        let bonds = detect(&[atom("H", 0.0, 0.0, 0.0), atom("H", d, 0.0, 0.0)]);
        assert!(bonds.is_empty());

        let bonds = detect(&[atom("H", 0.0, 0.0, 0.0), atom("H", d - 1e-9, 0.0, 0.0)]);
        assert_eq!(bonds.len(), 1);
    }

    #[test]
    fn unknown_elements_are_skipped_without_stalling() {
        let bonds = detect(&[
            atom("C", 0.0, 0.0, 0.0),
            atom("Qq", 0.0, 0.0, 0.1),
            atom("C", 0.0, 0.0, 0.2),
            atom("Qq", 0.0, 0.0, 0.3),
        ]);
        assert_eq!(bonds.len(), 1);
        assert!((bonds[0].pos_a.distance(bonds[0].pos_b) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn sorted_by_cutoff() {
        let bonds = detect(&[
            atom("C", 0.0, 0.0, 0.0),
            atom("C", 1.54, 0.0, 0.0),
            atom("C", 0.0, 1.2, 0.0),
            atom("C", 0.0, 0.0, 2.9),
        ]);
        assert!(bonds.len() >= 3);
        assert!(bonds.windows(2).all(|w| w[0].cutoff <= w[1].cutoff));
    }

    #[test]
    fn window_covers_pairs_along_z() {
        // Same pair, separated purely along z.
        let bonds = detect(&[atom("O", 0.0, 0.0, 1.0), atom("H", 0.0, 0.0, 0.0)]);
        assert_eq!(bonds.len(), 1);
        // Sweep order puts the lower-z atom first.
        assert_eq!(bonds[0].rad_a, 0.31);
    }
}
