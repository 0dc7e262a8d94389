use std::fmt;
use std::str::FromStr;
use failure::Fail;
use crate::element::{Element, Reference};

/// Lattice types which can be built from the lattice constant `a`
/// (and c/a where the lattice needs one).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrystalStructure {
    Sc,
    Fcc,
    Bcc,
    Diamond,
    Hcp,
    Bct,
    Tetragonal,
}

impl CrystalStructure {
    pub fn name(&self) -> &'static str {
        match *self {
            CrystalStructure::Sc => "sc",
            CrystalStructure::Fcc => "fcc",
            CrystalStructure::Bcc => "bcc",
            CrystalStructure::Diamond => "diamond",
            CrystalStructure::Hcp => "hcp",
            CrystalStructure::Bct => "bct",
            CrystalStructure::Tetragonal => "tetragonal",
        }
    }

    fn has_cubic_cell(&self) -> bool {
        match *self {
            CrystalStructure::Sc
            | CrystalStructure::Fcc
            | CrystalStructure::Bcc
            | CrystalStructure::Diamond => true,
            CrystalStructure::Hcp | CrystalStructure::Bct | CrystalStructure::Tetragonal => false,
        }
    }

    fn uses_covera(&self) -> bool {
        !self.has_cubic_cell()
    }
}

impl fmt::Display for CrystalStructure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CrystalStructure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "sc" => CrystalStructure::Sc,
            "fcc" => CrystalStructure::Fcc,
            "bcc" => CrystalStructure::Bcc,
            "diamond" => CrystalStructure::Diamond,
            "hcp" => CrystalStructure::Hcp,
            "bct" => CrystalStructure::Bct,
            "tetragonal" => CrystalStructure::Tetragonal,
            _ => return Err(Error::UnknownStructure(s.to_string())),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOptions {
    /// Build the conventional cubic cell instead of the primitive one.
    pub cubic: bool,
    /// Overrides the element's reference structure.
    pub crystalstructure: Option<CrystalStructure>,
    /// c/a for hcp, bct and tetragonal lattices.
    pub covera: Option<f64>,
}

/// A single-element crystal: lattice vectors as rows (Angstrom) and
/// fractional positions of every atom in the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Bulk {
    pub element: Element,
    pub structure: CrystalStructure,
    pub cell: [[f64; 3]; 3],
    pub fracs: Vec<[f64; 3]>,
}

impl Bulk {
    pub fn len(&self) -> usize {
        self.fracs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fracs.is_empty()
    }

    pub fn cartesian_positions(&self) -> Vec<[f64; 3]> {
        self.fracs.iter().map(|f| frac_to_cart(&self.cell, f)).collect()
    }

    pub fn lattice_lengths(&self) -> [f64; 3] {
        [
            norm(&self.cell[0]),
            norm(&self.cell[1]),
            norm(&self.cell[2]),
        ]
    }

    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.cell;
        let bxc = [
            b[1] * c[2] - b[2] * c[1],
            b[2] * c[0] - b[0] * c[2],
            b[0] * c[1] - b[1] * c[0],
        ];
        (a[0] * bxc[0] + a[1] * bxc[1] + a[2] * bxc[2]).abs()
    }
}

/// Build a bulk crystal of `element` with lattice constant `a` (Angstrom).
///
/// Without a `crystalstructure` override, the element's reference structure is
/// used. For hcp, bct and tetragonal lattices, c/a defaults to the reference
/// value when the structure matches the reference; hcp otherwise falls back to
/// the ideal sqrt(8/3).
pub fn bulk(element: Element, a: f64, opts: &BulkOptions) -> Result<Bulk, Error> {
    if !(a.is_finite() && a > 0.0) {
        return Err(Error::LatticeParam(a));
    }

    let reference = element.reference();
    let structure = match opts.crystalstructure {
        Some(s) => s,
        None => reference_structure(element, reference)?,
    };

    if opts.cubic && !structure.has_cubic_cell() {
        return Err(Error::IncompatibleCubic(structure));
    }

    let covera = if structure.uses_covera() {
        let c = match opts.covera {
            Some(c) => c,
            None => match (structure, reference) {
                (CrystalStructure::Hcp, Some(Reference::Hcp { covera }))
                | (CrystalStructure::Bct, Some(Reference::Bct { covera }))
                | (CrystalStructure::Tetragonal, Some(Reference::Tetragonal { covera })) => covera,
                (CrystalStructure::Hcp, _) => (8.0f64 / 3.0).sqrt(),
                _ => return Err(Error::MissingCovera(element.symbol(), structure)),
            },
        };
        if !(c.is_finite() && c > 0.0) {
            return Err(Error::Covera(c));
        }
        Some(c)
    } else {
        if let Some(c) = opts.covera {
            warn!("Ignoring c/a = {} for the {} structure.", c, structure);
        }
        None
    };

    let (cell, fracs) = match (structure, opts.cubic) {
        (CrystalStructure::Sc, _) => (scaled_identity(a), vec![[0.0, 0.0, 0.0]]),
        (CrystalStructure::Fcc, false) => (fcc_primitive(a), vec![[0.0, 0.0, 0.0]]),
        (CrystalStructure::Fcc, true) => (scaled_identity(a), FCC_CUBIC.to_vec()),
        (CrystalStructure::Bcc, false) => {
            let b = a / 2.0;
            (
                [[-b, b, b], [b, -b, b], [b, b, -b]],
                vec![[0.0, 0.0, 0.0]],
            )
        }
        (CrystalStructure::Bcc, true) => (
            scaled_identity(a),
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        ),
        (CrystalStructure::Diamond, false) => (
            fcc_primitive(a),
            vec![[0.0, 0.0, 0.0], [0.25, 0.25, 0.25]],
        ),
        (CrystalStructure::Diamond, true) => (scaled_identity(a), DIAMOND_CUBIC.to_vec()),
        (CrystalStructure::Hcp, _) => {
            let c = a * covera.unwrap_or_default();
            (
                [[a, 0.0, 0.0], [-a / 2.0, a * 3f64.sqrt() / 2.0, 0.0], [0.0, 0.0, c]],
                vec![[0.0, 0.0, 0.0], [1.0 / 3.0, 2.0 / 3.0, 0.5]],
            )
        }
        (CrystalStructure::Bct, _) => {
            let c = a * covera.unwrap_or_default();
            let (a2, c2) = (a / 2.0, c / 2.0);
            (
                [[-a2, a2, c2], [a2, -a2, c2], [a2, a2, -c2]],
                vec![[0.0, 0.0, 0.0]],
            )
        }
        (CrystalStructure::Tetragonal, _) => {
            let c = a * covera.unwrap_or_default();
            (
                [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, c]],
                vec![[0.0, 0.0, 0.0]],
            )
        }
    };

    Ok(Bulk {
        element,
        structure,
        cell,
        fracs,
    })
}

fn reference_structure(
    element: Element,
    reference: Option<Reference>,
) -> Result<CrystalStructure, Error> {
    match reference {
        Some(Reference::Sc) => Ok(CrystalStructure::Sc),
        Some(Reference::Fcc) => Ok(CrystalStructure::Fcc),
        Some(Reference::Bcc) => Ok(CrystalStructure::Bcc),
        Some(Reference::Diamond) => Ok(CrystalStructure::Diamond),
        Some(Reference::Hcp { .. }) => Ok(CrystalStructure::Hcp),
        Some(Reference::Bct { .. }) => Ok(CrystalStructure::Bct),
        Some(Reference::Tetragonal { .. }) => Ok(CrystalStructure::Tetragonal),
        Some(Reference::Other(name)) => Err(Error::UnsupportedReference(element.symbol(), name)),
        None => Err(Error::NoReference(element.symbol())),
    }
}

const FCC_CUBIC: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
];

const DIAMOND_CUBIC: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.25, 0.25, 0.25],
    [0.0, 0.5, 0.5],
    [0.25, 0.75, 0.75],
    [0.5, 0.0, 0.5],
    [0.75, 0.25, 0.75],
    [0.5, 0.5, 0.0],
    [0.75, 0.75, 0.25],
];

fn scaled_identity(a: f64) -> [[f64; 3]; 3] {
    [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
}

fn fcc_primitive(a: f64) -> [[f64; 3]; 3] {
    let b = a / 2.0;
    [[0.0, b, b], [b, 0.0, b], [b, b, 0.0]]
}

pub fn frac_to_cart(cell: &[[f64; 3]; 3], frac: &[f64; 3]) -> [f64; 3] {
    let mut r = [0.0; 3];
    for (j, r_j) in r.iter_mut().enumerate() {
        *r_j = frac[0] * cell[0][j] + frac[1] * cell[1][j] + frac[2] * cell[2][j];
    }
    r
}

fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "Lattice parameter must be positive and finite, got {}.", _0)] LatticeParam(f64),
    #[fail(display = "c/a must be positive and finite, got {}.", _0)] Covera(f64),
    #[fail(display = "Unknown crystal structure {:?}.", _0)] UnknownStructure(String),
    #[fail(display = "No reference crystal structure is known for {}.", _0)] NoReference(&'static str),
    #[fail(display = "Reference structure of {} is {}, which cannot be built from a lattice parameter alone.", _0, _1)]
    UnsupportedReference(&'static str, &'static str),
    #[fail(display = "Cannot build a cubic cell for the {} structure.", _0)] IncompatibleCubic(CrystalStructure),
    #[fail(display = "No c/a ratio given for {} in the {} structure.", _0, _1)]
    MissingCovera(&'static str, CrystalStructure),
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn element(s: &str) -> Element {
        Element::from_symbol(s).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < TOL, "{} != {}", a, b);
    }

    #[test]
    fn fcc_primitive_cell() {
        let cu = bulk(element("Cu"), 3.61, &BulkOptions::default()).unwrap();
        assert_eq!(cu.structure, CrystalStructure::Fcc);
        assert_eq!(cu.len(), 1);
        assert_eq!(cu.cell, [[0.0, 1.805, 1.805], [1.805, 0.0, 1.805], [1.805, 1.805, 0.0]]);
        assert_close(cu.volume(), 3.61f64.powi(3) / 4.0);
    }

    #[test]
    fn fcc_cubic_cell() {
        let opts = BulkOptions {
            cubic: true,
            ..BulkOptions::default()
        };
        let cu = bulk(element("Cu"), 3.61, &opts).unwrap();
        assert_eq!(cu.len(), 4);
        assert_eq!(cu.lattice_lengths(), [3.61, 3.61, 3.61]);
        assert_eq!(cu.cartesian_positions()[1], [0.0, 1.805, 1.805]);
    }

    #[test]
    fn bcc_cells() {
        let fe = bulk(element("Fe"), 2.87, &BulkOptions::default()).unwrap();
        assert_eq!(fe.len(), 1);
        assert_close(fe.volume(), 2.87f64.powi(3) / 2.0);

        let opts = BulkOptions {
            cubic: true,
            ..BulkOptions::default()
        };
        let fe = bulk(element("Fe"), 2.87, &opts).unwrap();
        assert_eq!(fe.len(), 2);
        assert_close(fe.volume(), 2.87f64.powi(3));
    }

    #[test]
    fn diamond_cells() {
        let si = bulk(element("Si"), 5.43, &BulkOptions::default()).unwrap();
        assert_eq!(si.len(), 2);
        let carts = si.cartesian_positions();
        for x in &carts[1] {
            assert_close(*x, 5.43 / 4.0);
        }

        let opts = BulkOptions {
            cubic: true,
            ..BulkOptions::default()
        };
        let si = bulk(element("Si"), 5.43, &opts).unwrap();
        assert_eq!(si.len(), 8);
    }

    #[test]
    fn hcp_uses_reference_covera() {
        let mg = bulk(element("Mg"), 3.21, &BulkOptions::default()).unwrap();
        assert_eq!(mg.structure, CrystalStructure::Hcp);
        assert_eq!(mg.len(), 2);
        let lengths = mg.lattice_lengths();
        assert_close(lengths[0], 3.21);
        assert_close(lengths[1], 3.21);
        assert_close(lengths[2], 3.21 * 1.624);
    }

    #[test]
    fn hcp_override_uses_ideal_covera() {
        let opts = BulkOptions {
            crystalstructure: Some(CrystalStructure::Hcp),
            ..BulkOptions::default()
        };
        let cu = bulk(element("Cu"), 2.5, &opts).unwrap();
        assert_close(cu.lattice_lengths()[2], 2.5 * (8.0f64 / 3.0).sqrt());
    }

    #[test]
    fn bct_needs_covera() {
        let opts = BulkOptions {
            crystalstructure: Some(CrystalStructure::Bct),
            ..BulkOptions::default()
        };
        match bulk(element("Cu"), 3.0, &opts) {
            Err(Error::MissingCovera("Cu", CrystalStructure::Bct)) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        let indium = bulk(element("In"), 3.25, &BulkOptions::default()).unwrap();
        assert_close(indium.volume(), 3.25f64.powi(3) * 1.076 / 2.0);
    }

    #[test]
    fn covera_ignored_for_cubic_lattices() {
        let opts = BulkOptions {
            crystalstructure: Some(CrystalStructure::Fcc),
            covera: Some(1.6),
            ..BulkOptions::default()
        };
        let cu = bulk(element("Cu"), 3.61, &opts).unwrap();
        assert_eq!(cu, bulk(element("Cu"), 3.61, &BulkOptions::default()).unwrap());
    }

    #[test]
    fn cubic_rejected_for_hexagonal() {
        let opts = BulkOptions {
            cubic: true,
            ..BulkOptions::default()
        };
        match bulk(element("Mg"), 3.21, &opts) {
            Err(Error::IncompatibleCubic(CrystalStructure::Hcp)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unsupported_elements() {
        match bulk(element("O"), 3.0, &BulkOptions::default()) {
            Err(Error::UnsupportedReference("O", "diatom")) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match bulk(element("Pm"), 3.0, &BulkOptions::default()) {
            Err(Error::NoReference("Pm")) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn bad_lattice_param() {
        for &a in &[0.0, -1.0, std::f64::NAN, std::f64::INFINITY] {
            assert!(bulk(element("Cu"), a, &BulkOptions::default()).is_err());
        }
    }

    #[test]
    fn structure_names() {
        assert_eq!("diamond".parse::<CrystalStructure>().unwrap(), CrystalStructure::Diamond);
        assert!("rhombohedral".parse::<CrystalStructure>().is_err());
        assert_eq!(CrystalStructure::Bct.to_string(), "bct");
    }
}
