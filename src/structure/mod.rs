//! Molecular structure data: parsing, element lookup, and derived geometry.
//!
//! The pipeline is `text → xyz::frames → Structure::from_atoms`, which
//! centres the atoms on their centroid, detects bonds, and computes the
//! bounding radius the renderer uses for its depth range.

pub mod bonds;
pub mod elements;
pub mod geometry;
pub mod xyz;

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::SpeckleError;

/// Scale applied to covalent radii wherever an atom's extent matters:
/// bond formation, the impostor cube size, and the bounding radius.
pub const RADIUS_SCALE: f64 = 2.5;

/// A single atom: element symbol plus position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Chemical symbol, keyed into the element table.
    pub symbol: String,
    /// Position (centroid-centred once part of a [`Structure`]).
    pub position: DVec3,
}

impl Atom {
    /// Create an atom from a symbol and coordinates.
    #[must_use]
    pub fn new(symbol: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            symbol: symbol.into(),
            position: DVec3::new(x, y, z),
        }
    }
}

/// A bond between two atoms, carrying everything the bond impostor needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    /// Position of the first atom.
    pub pos_a: DVec3,
    /// Position of the second atom.
    pub pos_b: DVec3,
    /// Covalent radius of the first atom.
    pub rad_a: f64,
    /// Covalent radius of the second atom.
    pub rad_b: f64,
    /// Display colour of the first atom.
    pub col_a: [f32; 3],
    /// Display colour of the second atom.
    pub col_b: [f32; 3],
    /// `distance / (rad_a + rad_b)`; lower means a tighter bond.
    pub cutoff: f64,
}

/// A centred molecule with its bonds and bounding radius.
///
/// Immutable once built; loading another molecule replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Centred atoms.
    pub atoms: Vec<Atom>,
    /// Bonds sorted ascending by cutoff.
    pub bonds: Vec<Bond>,
    /// Radius of the origin-centred sphere containing every atom's
    /// impostor.
    pub radius: f64,
}

impl Structure {
    /// Build a structure from raw atoms: centre, detect bonds, bound.
    ///
    /// Returns `None` for an empty atom list.
    #[must_use]
    pub fn from_atoms(mut atoms: Vec<Atom>) -> Option<Self> {
        if atoms.is_empty() {
            return None;
        }

        geometry::center(&mut atoms);
        let bonds = bonds::detect(&atoms);
        let radius = geometry::bounding_radius(&atoms);

        log::debug!(
            "structure: {} atoms, {} bond candidates, radius {:.3}",
            atoms.len(),
            bonds.len(),
            radius
        );

        Some(Self {
            atoms,
            bonds,
            radius,
        })
    }

    /// Build a structure from the first frame of XYZ text.
    ///
    /// Returns `None` when the text does not contain a complete frame.
    #[must_use]
    pub fn from_xyz(text: &str) -> Option<Self> {
        let frame = xyz::frames(text).next()?;
        let atoms = frame
            .into_iter()
            .map(|a| Atom {
                symbol: a.symbol,
                position: DVec3::from_array(a.position),
            })
            .collect();
        Self::from_atoms(atoms)
    }

    /// Read and parse an XYZ file.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Io`] if the file cannot be read and
    /// [`SpeckleError::StructureLoad`] if it holds no complete frame.
    pub fn load(path: &Path) -> Result<Self, SpeckleError> {
        let text = std::fs::read_to_string(path)?;
        let structure = Self::from_xyz(&text).ok_or_else(|| {
            SpeckleError::StructureLoad(format!(
                "{} contains no complete XYZ frame",
                path.display()
            ))
        })?;
        log::info!(
            "loaded {} ({} atoms)",
            path.display(),
            structure.atoms.len()
        );
        Ok(structure)
    }

    /// Diameter of the bounding sphere: the depth extent of every pass.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.radius * 2.0
    }

    /// Bonds whose cutoff does not exceed `threshold`.
    ///
    /// Bonds are sorted by cutoff, so this is a prefix of the bond list.
    #[must_use]
    pub fn bonds_within(&self, threshold: f64) -> &[Bond] {
        let end = self.bonds.partition_point(|b| b.cutoff <= threshold);
        &self.bonds[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_FRAGMENT: &str = "2\ncomment\nO 0 0 0\nH 1 0 0\n";

    #[test]
    fn from_xyz_builds_centred_structure() {
        let s = Structure::from_xyz(WATER_FRAGMENT).unwrap();
        assert_eq!(s.atoms.len(), 2);
        assert_eq!(s.atoms[0].symbol, "O");
        assert_eq!(s.atoms[1].symbol, "H");
        let sum: DVec3 = s.atoms.iter().map(|a| a.position).sum();
        assert!(sum.length() < 1e-12);
        assert_eq!(s.bonds.len(), 1);
        assert!((s.bonds[0].cutoff - 1.0 / 0.97).abs() < 1e-12);
    }

    #[test]
    fn empty_text_yields_no_structure() {
        assert!(Structure::from_xyz("").is_none());
        assert!(Structure::from_xyz("   \n  \n").is_none());
    }

    #[test]
    fn bonds_within_is_a_prefix() {
        let text = "3\n\nC 0 0 0\nC 1.5 0 0\nC 0 2.5 0\n";
        let s = Structure::from_xyz(text).unwrap();
        assert!(s.bonds.len() >= 2);
        let threshold = s.bonds[0].cutoff;
        let within = s.bonds_within(threshold);
        assert!(!within.is_empty());
        assert!(within.iter().all(|b| b.cutoff <= threshold));
        assert_eq!(s.bonds_within(f64::INFINITY).len(), s.bonds.len());
        assert!(s.bonds_within(0.0).is_empty());
    }

    #[test]
    fn range_is_twice_radius() {
        let s = Structure::from_xyz(WATER_FRAGMENT).unwrap();
        assert_eq!(s.range(), s.radius * 2.0);
    }
}
