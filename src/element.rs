use std::fmt;
use std::str;
use failure::Fail;

/// Represents a specific atomic number.
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Element(u16);

/// Ground-state crystal structure of an element, as tabulated in the
/// reference data. Only the lattice type and, where relevant, c/a are kept;
/// the lattice constant always comes from the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Reference {
    Sc,
    Fcc,
    Bcc,
    Diamond,
    Hcp { covera: f64 },
    Bct { covera: f64 },
    Tetragonal { covera: f64 },
    /// A structure that needs more than `a` and c/a to build.
    Other(&'static str),
}

#[derive(Debug, Fail)]
#[fail(display = "Unable to parse element symbol: {:?}", text)]
pub struct ElementParseError {
    text: String,
}

struct ElementData {
    symbol: &'static str,
    mass: f64,
    reference: Option<Reference>,
}

impl Element {
    pub fn from_atomic_number(n: u32) -> Option<Self> {
        if n >= 1 && (n as usize) <= ELEMENTS.len() {
            Some(Element(n as u16))
        } else {
            None
        }
    }

    pub fn from_symbol(s: &str) -> Result<Self, ElementParseError> {
        ELEMENTS
            .iter()
            .position(|data| data.symbol == s)
            .map(|i| Element(i as u16 + 1))
            .ok_or_else(|| ElementParseError {
                text: s.to_string(),
            })
    }

    pub fn atomic_number(&self) -> u32 {
        self.0.into()
    }

    pub fn symbol(&self) -> &'static str {
        self.data().symbol
    }

    /// Standard atomic weight, in atomic mass units.
    pub fn mass(&self) -> f64 {
        self.data().mass
    }

    pub fn reference(&self) -> Option<Reference> {
        self.data().reference
    }

    fn data(&self) -> &'static ElementData {
        &ELEMENTS[self.0 as usize - 1]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.symbol(), f)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self.symbol(), f)
    }
}

impl str::FromStr for Element {
    type Err = ElementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::from_symbol(s)
    }
}

const fn el(symbol: &'static str, mass: f64, reference: Option<Reference>) -> ElementData {
    ElementData {
        symbol,
        mass,
        reference,
    }
}

use self::Reference::*;

// Indexed by atomic number - 1.
static ELEMENTS: &[ElementData] = &[
    el("H", 1.008, Some(Other("diatom"))),
    el("He", 4.002602, Some(Hcp { covera: 1.633 })),
    el("Li", 6.94, Some(Bcc)),
    el("Be", 9.0121831, Some(Hcp { covera: 1.567 })),
    el("B", 10.81, Some(Tetragonal { covera: 0.576 })),
    el("C", 12.011, Some(Diamond)),
    el("N", 14.007, Some(Other("diatom"))),
    el("O", 15.999, Some(Other("diatom"))),
    el("F", 18.998403163, Some(Other("diatom"))),
    el("Ne", 20.1797, Some(Fcc)),
    el("Na", 22.98976928, Some(Bcc)),
    el("Mg", 24.305, Some(Hcp { covera: 1.624 })),
    el("Al", 26.9815385, Some(Fcc)),
    el("Si", 28.085, Some(Diamond)),
    el("P", 30.973761998, Some(Other("cubic"))),
    el("S", 32.06, Some(Other("orthorhombic"))),
    el("Cl", 35.45, Some(Other("orthorhombic"))),
    el("Ar", 39.948, Some(Fcc)),
    el("K", 39.0983, Some(Bcc)),
    el("Ca", 40.078, Some(Fcc)),
    el("Sc", 44.955908, Some(Hcp { covera: 1.594 })),
    el("Ti", 47.867, Some(Hcp { covera: 1.588 })),
    el("V", 50.9415, Some(Bcc)),
    el("Cr", 51.9961, Some(Bcc)),
    el("Mn", 54.938044, Some(Other("cubic"))),
    el("Fe", 55.845, Some(Bcc)),
    el("Co", 58.933194, Some(Hcp { covera: 1.622 })),
    el("Ni", 58.6934, Some(Fcc)),
    el("Cu", 63.546, Some(Fcc)),
    el("Zn", 65.38, Some(Hcp { covera: 1.856 })),
    el("Ga", 69.723, Some(Other("orthorhombic"))),
    el("Ge", 72.63, Some(Diamond)),
    el("As", 74.921595, Some(Other("rhombohedral"))),
    el("Se", 78.971, Some(Hcp { covera: 1.136 })),
    el("Br", 79.904, Some(Other("orthorhombic"))),
    el("Kr", 83.798, Some(Fcc)),
    el("Rb", 85.4678, Some(Bcc)),
    el("Sr", 87.62, Some(Fcc)),
    el("Y", 88.90584, Some(Hcp { covera: 1.571 })),
    el("Zr", 91.224, Some(Hcp { covera: 1.593 })),
    el("Nb", 92.90637, Some(Bcc)),
    el("Mo", 95.95, Some(Bcc)),
    el("Tc", 97.90721, Some(Hcp { covera: 1.604 })),
    el("Ru", 101.07, Some(Hcp { covera: 1.584 })),
    el("Rh", 102.9055, Some(Fcc)),
    el("Pd", 106.42, Some(Fcc)),
    el("Ag", 107.8682, Some(Fcc)),
    el("Cd", 112.414, Some(Hcp { covera: 1.886 })),
    el("In", 114.818, Some(Bct { covera: 1.076 })),
    el("Sn", 118.71, Some(Diamond)),
    el("Sb", 121.76, Some(Other("rhombohedral"))),
    el("Te", 127.6, Some(Hcp { covera: 1.33 })),
    el("I", 126.90447, Some(Other("orthorhombic"))),
    el("Xe", 131.293, Some(Fcc)),
    el("Cs", 132.90545196, Some(Bcc)),
    el("Ba", 137.327, Some(Bcc)),
    el("La", 138.90547, Some(Hcp { covera: 1.619 })),
    el("Ce", 140.116, Some(Fcc)),
    el("Pr", 140.90766, Some(Hcp { covera: 1.614 })),
    el("Nd", 144.242, Some(Hcp { covera: 1.614 })),
    el("Pm", 144.91276, None),
    el("Sm", 150.36, Some(Other("rhombohedral"))),
    el("Eu", 151.964, Some(Bcc)),
    el("Gd", 157.25, Some(Hcp { covera: 1.588 })),
    el("Tb", 158.92535, Some(Hcp { covera: 1.581 })),
    el("Dy", 162.5, Some(Hcp { covera: 1.573 })),
    el("Ho", 164.93033, Some(Hcp { covera: 1.57 })),
    el("Er", 167.259, Some(Hcp { covera: 1.57 })),
    el("Tm", 168.93422, Some(Hcp { covera: 1.57 })),
    el("Yb", 173.054, Some(Fcc)),
    el("Lu", 174.9668, Some(Hcp { covera: 1.585 })),
    el("Hf", 178.49, Some(Hcp { covera: 1.582 })),
    el("Ta", 180.94788, Some(Bcc)),
    el("W", 183.84, Some(Bcc)),
    el("Re", 186.207, Some(Hcp { covera: 1.615 })),
    el("Os", 190.23, Some(Hcp { covera: 1.579 })),
    el("Ir", 192.217, Some(Fcc)),
    el("Pt", 195.084, Some(Fcc)),
    el("Au", 196.966569, Some(Fcc)),
    el("Hg", 200.592, Some(Other("rhombohedral"))),
    el("Tl", 204.38, Some(Hcp { covera: 1.599 })),
    el("Pb", 207.2, Some(Fcc)),
    el("Bi", 208.9804, Some(Other("rhombohedral"))),
    el("Po", 208.98243, Some(Sc)),
    el("At", 209.98715, None),
    el("Rn", 222.01758, None),
    el("Fr", 223.01974, None),
    el("Ra", 226.02541, None),
    el("Ac", 227.02775, Some(Fcc)),
    el("Th", 232.0377, Some(Fcc)),
    el("Pa", 231.03588, Some(Tetragonal { covera: 0.825 })),
    el("U", 238.02891, Some(Other("orthorhombic"))),
    el("Np", 237.04817, Some(Other("orthorhombic"))),
    el("Pu", 244.06421, Some(Other("monoclinic"))),
    el("Am", 243.06138, None),
    el("Cm", 247.07035, None),
    el("Bk", 247.07031, None),
    el("Cf", 251.07959, None),
    el("Es", 252.083, None),
    el("Fm", 257.09511, None),
    el("Md", 258.09843, None),
    el("No", 259.101, None),
    el("Lr", 262.11, None),
];
