//! Static element table: covalent radius and display colour per symbol.
//!
//! Radii are single-bond covalent radii in ångströms (Cordero et al.,
//! 2008). Colours follow the common CPK/Jmol scheme.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Per-element properties used for bonding and drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Chemical symbol (canonical capitalisation).
    pub symbol: &'static str,
    /// Atomic number.
    pub number: u32,
    /// Covalent radius in ångströms.
    pub radius: f64,
    /// Display colour as `0xRRGGBB`.
    pub hex: u32,
}

impl Element {
    /// Display colour as RGB in `[0, 1]`.
    #[must_use]
    pub fn color(&self) -> [f32; 3] {
        [
            ((self.hex >> 16) & 0xff) as f32 / 255.0,
            ((self.hex >> 8) & 0xff) as f32 / 255.0,
            (self.hex & 0xff) as f32 / 255.0,
        ]
    }
}

const fn el(symbol: &'static str, number: u32, radius: f64, hex: u32) -> Element {
    Element {
        symbol,
        number,
        radius,
        hex,
    }
}

/// All known elements in atomic-number order.
pub static ELEMENTS: [Element; 96] = [
    el("H", 1, 0.31, 0xFFFFFF),
    el("He", 2, 0.28, 0xD9FFFF),
    el("Li", 3, 1.28, 0xCC80FF),
    el("Be", 4, 0.96, 0xC2FF00),
    el("B", 5, 0.84, 0xFFB5B5),
    el("C", 6, 0.76, 0x909090),
    el("N", 7, 0.71, 0x3050F8),
    el("O", 8, 0.66, 0xFF0D0D),
    el("F", 9, 0.57, 0x90E050),
    el("Ne", 10, 0.58, 0xB3E3F5),
    el("Na", 11, 1.66, 0xAB5CF2),
    el("Mg", 12, 1.41, 0x8AFF00),
    el("Al", 13, 1.21, 0xBFA6A6),
    el("Si", 14, 1.11, 0xF0C8A0),
    el("P", 15, 1.07, 0xFF8000),
    el("S", 16, 1.05, 0xFFFF30),
    el("Cl", 17, 1.02, 0x1FF01F),
    el("Ar", 18, 1.06, 0x80D1E3),
    el("K", 19, 2.03, 0x8F40D4),
    el("Ca", 20, 1.76, 0x3DFF00),
    el("Sc", 21, 1.70, 0xE6E6E6),
    el("Ti", 22, 1.60, 0xBFC2C7),
    el("V", 23, 1.53, 0xA6A6AB),
    el("Cr", 24, 1.39, 0x8A99C7),
    el("Mn", 25, 1.39, 0x9C7AC7),
    el("Fe", 26, 1.32, 0xE06633),
    el("Co", 27, 1.26, 0xF090A0),
    el("Ni", 28, 1.24, 0x50D050),
    el("Cu", 29, 1.32, 0xC88033),
    el("Zn", 30, 1.22, 0x7D80B0),
    el("Ga", 31, 1.22, 0xC28F8F),
    el("Ge", 32, 1.20, 0x668F8F),
    el("As", 33, 1.19, 0xBD80E3),
    el("Se", 34, 1.20, 0xFFA100),
    el("Br", 35, 1.20, 0xA62929),
    el("Kr", 36, 1.16, 0x5CB8D1),
    el("Rb", 37, 2.20, 0x702EB0),
    el("Sr", 38, 1.95, 0x00FF00),
    el("Y", 39, 1.90, 0x94FFFF),
    el("Zr", 40, 1.75, 0x94E0E0),
    el("Nb", 41, 1.64, 0x73C2C9),
    el("Mo", 42, 1.54, 0x54B5B5),
    el("Tc", 43, 1.47, 0x3B9E9E),
    el("Ru", 44, 1.46, 0x248F8F),
    el("Rh", 45, 1.42, 0x0A7D8C),
    el("Pd", 46, 1.39, 0x006985),
    el("Ag", 47, 1.45, 0xC0C0C0),
    el("Cd", 48, 1.44, 0xFFD98F),
    el("In", 49, 1.42, 0xA67573),
    el("Sn", 50, 1.39, 0x668080),
    el("Sb", 51, 1.39, 0x9E63B5),
    el("Te", 52, 1.38, 0xD47A00),
    el("I", 53, 1.39, 0x940094),
    el("Xe", 54, 1.40, 0x429EB0),
    el("Cs", 55, 2.44, 0x57178F),
    el("Ba", 56, 2.15, 0x00C900),
    el("La", 57, 2.07, 0x70D4FF),
    el("Ce", 58, 2.04, 0xFFFFC7),
    el("Pr", 59, 2.03, 0xD9FFC7),
    el("Nd", 60, 2.01, 0xC7FFC7),
    el("Pm", 61, 1.99, 0xA3FFC7),
    el("Sm", 62, 1.98, 0x8FFFC7),
    el("Eu", 63, 1.98, 0x61FFC7),
    el("Gd", 64, 1.96, 0x45FFC7),
    el("Tb", 65, 1.94, 0x30FFC7),
    el("Dy", 66, 1.92, 0x1FFFC7),
    el("Ho", 67, 1.92, 0x00FF9C),
    el("Er", 68, 1.89, 0x00E675),
    el("Tm", 69, 1.90, 0x00D452),
    el("Yb", 70, 1.87, 0x00BF38),
    el("Lu", 71, 1.87, 0x00AB24),
    el("Hf", 72, 1.75, 0x4DC2FF),
    el("Ta", 73, 1.70, 0x4DA6FF),
    el("W", 74, 1.62, 0x2194D6),
    el("Re", 75, 1.51, 0x267DAB),
    el("Os", 76, 1.44, 0x266696),
    el("Ir", 77, 1.41, 0x175487),
    el("Pt", 78, 1.36, 0xD0D0E0),
    el("Au", 79, 1.36, 0xFFD123),
    el("Hg", 80, 1.32, 0xB8B8D0),
    el("Tl", 81, 1.45, 0xA6544D),
    el("Pb", 82, 1.46, 0x575961),
    el("Bi", 83, 1.48, 0x9E4FB5),
    el("Po", 84, 1.40, 0xAB5C00),
    el("At", 85, 1.50, 0x754F45),
    el("Rn", 86, 1.50, 0x428296),
    el("Fr", 87, 2.60, 0x420066),
    el("Ra", 88, 2.21, 0x007D00),
    el("Ac", 89, 2.15, 0x70ABFA),
    el("Th", 90, 2.06, 0x00BAFF),
    el("Pa", 91, 2.00, 0x00A1FF),
    el("U", 92, 1.96, 0x008FFF),
    el("Np", 93, 1.90, 0x0080FF),
    el("Pu", 94, 1.87, 0x006BFF),
    el("Am", 95, 1.80, 0x545CF2),
    el("Cm", 96, 1.69, 0x785CE3),
];

struct ElementTable {
    by_symbol: FxHashMap<&'static str, &'static Element>,
    min_radius: f64,
    max_radius: f64,
}

static TABLE: LazyLock<ElementTable> = LazyLock::new(|| {
    let by_symbol = ELEMENTS.iter().map(|e| (e.symbol, e)).collect();
    let (min_radius, max_radius) = ELEMENTS
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.radius), hi.max(e.radius))
        });
    ElementTable {
        by_symbol,
        min_radius,
        max_radius,
    }
});

/// Look up an element by symbol.
///
/// Exact matches win; otherwise the symbol is retried in canonical
/// capitalisation so `CL` and `cl` resolve to chlorine.
#[must_use]
pub fn lookup(symbol: &str) -> Option<&'static Element> {
    if let Some(&e) = TABLE.by_symbol.get(symbol) {
        return Some(e);
    }
    let mut chars = symbol.chars();
    let first = chars.next()?;
    let canonical: String = first
        .to_uppercase()
        .chain(chars.flat_map(char::to_lowercase))
        .collect();
    TABLE.by_symbol.get(canonical.as_str()).copied()
}

/// Smallest covalent radius in the table.
#[must_use]
pub fn min_radius() -> f64 {
    TABLE.min_radius
}

/// Largest covalent radius in the table.
#[must_use]
pub fn max_radius() -> f64 {
    TABLE.max_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_elements() {
        let o = lookup("O").unwrap();
        assert_eq!(o.radius, 0.66);
        assert_eq!(o.number, 8);
        assert_eq!(lookup("H").unwrap().radius, 0.31);
        let c = lookup("C").unwrap().color();
        assert_eq!(c[0], c[1]);
        assert!((c[0] - 144.0 / 255.0).abs() < 1e-6);
        assert_eq!(lookup("H").unwrap().color(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn case_insensitive_fallback() {
        assert_eq!(lookup("CL").unwrap().symbol, "Cl");
        assert_eq!(lookup("fe").unwrap().symbol, "Fe");
        assert!(lookup("Xx").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn radius_extremes() {
        assert_eq!(min_radius(), 0.28);
        assert_eq!(max_radius(), 2.60);
        assert!(ELEMENTS
            .iter()
            .all(|e| (min_radius()..=max_radius()).contains(&e.radius)));
    }

    #[test]
    fn numbers_are_sequential() {
        for (i, e) in ELEMENTS.iter().enumerate() {
            assert_eq!(e.number as usize, i + 1);
        }
    }
}
