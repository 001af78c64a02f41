//! GPU instance records for atoms and bonds.

use bytemuck::{Pod, Zeroable};

use crate::structure::{elements, Bond, Structure};

/// Per-atom storage-buffer record (matches `Atom` in `atoms.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AtomInstance {
    /// Centre in structure space.
    pub position: [f32; 3],
    /// Covalent radius; the shader scales it for display.
    pub radius: f32,
    /// Element colour.
    pub color: [f32; 3],
    /// Padding to 16-byte alignment.
    pub _pad: f32,
}

/// Per-bond storage-buffer record (matches `Bond` in `bonds.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BondInstance {
    /// First endpoint.
    pub pos_a: [f32; 3],
    /// Covalent radius of the first atom.
    pub rad_a: f32,
    /// Second endpoint.
    pub pos_b: [f32; 3],
    /// Covalent radius of the second atom.
    pub rad_b: f32,
    /// Colour of the half nearer `pos_a`.
    pub col_a: [f32; 3],
    /// Padding.
    pub _pad0: f32,
    /// Colour of the half nearer `pos_b`.
    pub col_b: [f32; 3],
    /// Padding.
    pub _pad1: f32,
}

impl From<&Bond> for BondInstance {
    fn from(bond: &Bond) -> Self {
        Self {
            pos_a: bond.pos_a.as_vec3().to_array(),
            rad_a: bond.rad_a as f32,
            pos_b: bond.pos_b.as_vec3().to_array(),
            rad_b: bond.rad_b as f32,
            col_a: bond.col_a,
            _pad0: 0.0,
            col_b: bond.col_b,
            _pad1: 0.0,
        }
    }
}

/// One instance per atom with a known element; others are skipped.
#[must_use]
pub fn atom_instances(structure: &Structure) -> Vec<AtomInstance> {
    let instances: Vec<AtomInstance> = structure
        .atoms
        .iter()
        .filter_map(|atom| {
            let element = elements::lookup(&atom.symbol)?;
            Some(AtomInstance {
                position: atom.position.as_vec3().to_array(),
                radius: element.radius as f32,
                color: element.color(),
                _pad: 0.0,
            })
        })
        .collect();

    let skipped = structure.atoms.len() - instances.len();
    if skipped > 0 {
        log::warn!("{skipped} atoms with unknown elements are not drawn");
    }
    instances
}

/// Instances for the bonds whose cutoff is within `threshold`.
#[must_use]
pub fn bond_instances(structure: &Structure, threshold: f64) -> Vec<BondInstance> {
    structure
        .bonds_within(threshold)
        .iter()
        .map(BondInstance::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Atom;

    fn methanol_fragment() -> Structure {
        Structure::from_atoms(vec![
            Atom::new("C", 0.0, 0.0, 0.0),
            Atom::new("O", 1.4, 0.0, 0.0),
            Atom::new("H", -0.5, 0.9, 0.0),
            Atom::new("Xx", 0.0, 0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn layouts_match_shaders() {
        assert_eq!(size_of::<AtomInstance>(), 32);
        assert_eq!(size_of::<BondInstance>(), 64);
    }

    #[test]
    fn unknown_elements_are_skipped() {
        let structure = methanol_fragment();
        let atoms = atom_instances(&structure);
        assert_eq!(atoms.len(), 3);
        let carbon = elements::lookup("C").unwrap();
        assert_eq!(atoms[0].radius, carbon.radius as f32);
        assert_eq!(atoms[0].color, carbon.color());
    }

    #[test]
    fn positions_are_centred() {
        let structure = methanol_fragment();
        let atoms = atom_instances(&structure);
        let first = structure.atoms[0].position.as_vec3().to_array();
        assert_eq!(atoms[0].position, first);
    }

    #[test]
    fn bond_threshold_limits_instances() {
        let structure = methanol_fragment();
        let all = bond_instances(&structure, f64::MAX);
        assert_eq!(all.len(), structure.bonds.len());
        assert!(bond_instances(&structure, 0.0).is_empty());

        let tightest = structure.bonds[0].cutoff;
        let within = bond_instances(&structure, tightest);
        assert!(!within.is_empty());
        assert_eq!(within[0], BondInstance::from(&structure.bonds[0]));
    }
}
