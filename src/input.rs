use std::collections::HashSet;
use failure::Fail;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub control: Control,
    pub system: System,
    /// Written to `&CELL`. Only meaningful for variable-cell calculations.
    pub cell_dofree: Option<CellDoFree>,

    pub species: Vec<AtomicSpecies>,
    pub k_points: KPoints,
    pub cell: Cell,
    pub positions: Positions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub calculation: Calculation,
    pub tstress: Option<bool>,
    pub tprnfor: Option<bool>,
    pub pseudo_dir: Option<String>,
}

/// Fields of `&SYSTEM` which are not derived from the structure.
/// `ibrav`, `nat` and `ntyp` are filled in when the file is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub ecutwfc: Option<f64>,
    pub ecutrho: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Calculation {
    Scf,
    Relax,
    /// Variable-cell relaxation.
    VcRelax,
}

impl Calculation {
    pub fn has_variable_cell(&self) -> bool {
        *self == Calculation::VcRelax
    }
}

/// Cell degrees of freedom allowed to vary during a variable-cell calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellDoFree {
    All,
    /// Keep the Bravais lattice type; only its parameters vary.
    Ibrav,
    Shape,
    Volume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicSpecies {
    pub species: String,
    pub mass: f64,
    pub pseudopotential: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KPoints {
    Gamma,
    /// Monkhorst-Pack grid with `offset` entries of 0 (unshifted) or 1 (half-step shift).
    Automatic { grid: [u64; 3], offset: [u64; 3] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub units: LatticeUnits,
    pub cell: [[f64; 3]; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeUnits {
    Bohr,
    Angstrom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Positions {
    pub coordinate_type: PositionCoordinateType,
    pub coordinates: Vec<AtomCoordinate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionCoordinateType {
    BohrCartesian,
    AngstromCartesian,
    Crystal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomCoordinate {
    pub species: String,
    pub r: [f64; 3],
}

pub fn validate(input: &Input) -> Result<(), ErrorList> {
    let mut errs = Vec::new();

    if input.positions.coordinates.is_empty() {
        errs.push(Error::NoAtoms);
    }

    if let KPoints::Automatic { grid, offset } = input.k_points {
        if grid.iter().any(|&n| n == 0) {
            errs.push(Error::KPointGrid(grid));
        }
        if offset.iter().any(|&o| o > 1) {
            errs.push(Error::KPointOffset(offset));
        }
    }

    let mut listed = HashSet::new();
    for species in &input.species {
        if !listed.insert(species.species.as_str()) {
            errs.push(Error::DuplicateSpecies(species.species.clone()));
        }
    }

    let mut missing = Vec::new();
    for coord in &input.positions.coordinates {
        let name = coord.species.as_str();
        if !listed.contains(name) && !missing.contains(&name) {
            missing.push(name);
        }
    }
    for name in missing {
        errs.push(Error::MissingSpecies(name.to_string()));
    }

    if input.cell_dofree.is_some() && !input.control.calculation.has_variable_cell() {
        errs.push(Error::FixedCellDoFree);
    }

    let cutoffs = [("ecutwfc", input.system.ecutwfc), ("ecutrho", input.system.ecutrho)];
    for &(name, cutoff) in &cutoffs {
        match cutoff {
            Some(x) if !(x.is_finite() && x > 0.0) => errs.push(Error::Cutoff(name, x)),
            _ => {}
        }
    }

    crate::error::ErrorList::from_vec(errs)
}

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "At least one atom is required.")] NoAtoms,
    #[fail(display = "K-point grid entries must be positive, got {:?}.", _0)] KPointGrid([u64; 3]),
    #[fail(display = "K-point offsets must be 0 or 1, got {:?}.", _0)] KPointOffset([u64; 3]),
    #[fail(display = "Species {} appears more than once in ATOMIC_SPECIES.", _0)] DuplicateSpecies(String),
    #[fail(display = "Species {} is used in ATOMIC_POSITIONS but not listed in ATOMIC_SPECIES.", _0)]
    MissingSpecies(String),
    #[fail(display = "`cell_dofree` requires a variable-cell calculation.")] FixedCellDoFree,
    #[fail(display = "`{}` must be positive and finite, got {}.", _0, _1)] Cutoff(&'static str, f64),
}

pub type ErrorList = crate::error::ErrorList<Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn copper() -> Input {
        Input {
            control: Control {
                calculation: Calculation::VcRelax,
                tstress: Some(true),
                tprnfor: Some(true),
                pseudo_dir: None,
            },
            system: System::default(),
            cell_dofree: Some(CellDoFree::Ibrav),
            species: vec![AtomicSpecies {
                species: String::from("Cu"),
                mass: 63.546,
                pseudopotential: String::from("Cu.pbe-n-kjpaw_psl.1.0.0.UPF"),
            }],
            k_points: KPoints::Automatic {
                grid: [2, 2, 2],
                offset: [0, 0, 0],
            },
            cell: Cell {
                units: LatticeUnits::Angstrom,
                cell: [[0.0, 1.805, 1.805], [1.805, 0.0, 1.805], [1.805, 1.805, 0.0]],
            },
            positions: Positions {
                coordinate_type: PositionCoordinateType::AngstromCartesian,
                coordinates: vec![AtomCoordinate {
                    species: String::from("Cu"),
                    r: [0.0, 0.0, 0.0],
                }],
            },
        }
    }

    #[test]
    fn valid_input() {
        assert!(validate(&copper()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut input = copper();
        input.control.calculation = Calculation::Scf;
        input.k_points = KPoints::Automatic {
            grid: [2, 0, 2],
            offset: [0, 2, 0],
        };
        input.positions.coordinates.push(AtomCoordinate {
            species: String::from("Ag"),
            r: [0.5, 0.5, 0.5],
        });
        let duplicate = input.species[0].clone();
        input.species.push(duplicate);
        input.system.ecutwfc = Some(std::f64::NAN);

        let errs = validate(&input).unwrap_err().errs;
        assert_eq!(errs.len(), 6);
        match errs[0] {
            Error::KPointGrid([2, 0, 2]) => {}
            ref e => panic!("unexpected error: {}", e),
        }
        match errs[3] {
            Error::MissingSpecies(ref s) if s == "Ag" => {}
            ref e => panic!("unexpected error: {}", e),
        }
        match errs[5] {
            Error::Cutoff("ecutwfc", x) if x.is_nan() => {}
            ref e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn cutoffs_must_be_positive() {
        let mut input = copper();
        input.system.ecutwfc = Some(45.0);
        input.system.ecutrho = Some(360.0);
        assert!(validate(&input).is_ok());

        input.system.ecutwfc = Some(0.0);
        input.system.ecutrho = Some(std::f64::INFINITY);
        let errs = validate(&input).unwrap_err().errs;
        assert_eq!(errs.len(), 2);
        match errs[0] {
            Error::Cutoff("ecutwfc", x) if x == 0.0 => {}
            ref e => panic!("unexpected error: {}", e),
        }
        match errs[1] {
            Error::Cutoff("ecutrho", _) => {}
            ref e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn no_atoms() {
        let mut input = copper();
        input.positions.coordinates.clear();
        let errs = validate(&input).unwrap_err().errs;
        assert_eq!(errs.len(), 1);
    }
}
