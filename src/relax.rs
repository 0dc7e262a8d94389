use std::env;
use std::io;
use std::path::{Path, PathBuf};
use failure::Fail;
use crate::bulk;
use crate::bulk::{Bulk, BulkOptions, CrystalStructure};
use crate::element::Element;
use crate::input::{AtomCoordinate, AtomicSpecies, Calculation, Cell, CellDoFree, Control, Input,
                   KPoints, LatticeUnits, PositionCoordinateType, Positions, System};
use crate::serialize;
use crate::FailResult;

/// Environment variable read by pw.x to locate pseudopotential files.
pub const PSEUDO_ENV_VAR: &str = "ESPRESSO_PSEUDO";

const PSEUDOPOTENTIAL_SUFFIX: &str = ".pbe-n-kjpaw_psl.1.0.0.UPF";

/// Everything needed to generate a variable-cell relaxation input.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxParams {
    pub element: Element,
    /// Lattice constant `a`, in Angstrom.
    pub lattice_param: f64,
    pub cubic: bool,
    /// Write atomic positions in crystal (fractional) coordinates.
    pub crystal: bool,
    pub kpts: [u64; 3],
    pub koffset: [u64; 3],
    pub crystalstructure: Option<CrystalStructure>,
    pub covera: Option<f64>,
    pub ecutwfc: Option<f64>,
    pub ecutrho: Option<f64>,
    pub pseudo_dir: Option<String>,
}

impl RelaxParams {
    pub fn new(element: Element, lattice_param: f64, cubic: bool, crystal: bool, kpts: [u64; 3]) -> Self {
        RelaxParams {
            element,
            lattice_param,
            cubic,
            crystal,
            kpts,
            koffset: [0, 0, 0],
            crystalstructure: None,
            covera: None,
            ecutwfc: None,
            ecutrho: None,
            pseudo_dir: None,
        }
    }

    fn bulk_options(&self) -> BulkOptions {
        BulkOptions {
            cubic: self.cubic,
            crystalstructure: self.crystalstructure,
            covera: self.covera,
        }
    }
}

/// PSlibrary PAW pseudopotential file name for an element, e.g.
/// `Cu.pbe-n-kjpaw_psl.1.0.0.UPF`.
pub fn pseudopotential_filename(symbol: &str) -> String {
    format!("{}{}", symbol, PSEUDOPOTENTIAL_SUFFIX)
}

pub fn relax_input(params: &RelaxParams) -> Result<Input, Error> {
    let structure = bulk::bulk(params.element, params.lattice_param, &params.bulk_options())?;
    info!(
        "Built {} {} cell with {} atom(s)",
        params.element,
        structure.structure,
        structure.len()
    );
    debug!("Cell vectors (Angstrom): {:?}", structure.cell);

    let symbol = params.element.symbol();
    let species = vec![AtomicSpecies {
        species: symbol.to_string(),
        mass: params.element.mass(),
        pseudopotential: pseudopotential_filename(symbol),
    }];

    Ok(Input {
        control: Control {
            calculation: Calculation::VcRelax,
            tstress: Some(true),
            tprnfor: Some(true),
            pseudo_dir: params.pseudo_dir.clone(),
        },
        system: System {
            ecutwfc: params.ecutwfc,
            ecutrho: params.ecutrho,
        },
        cell_dofree: Some(CellDoFree::Ibrav),
        species,
        k_points: KPoints::Automatic {
            grid: params.kpts,
            offset: params.koffset,
        },
        cell: Cell {
            units: LatticeUnits::Angstrom,
            cell: structure.cell,
        },
        positions: make_positions(&structure, params.crystal),
    })
}

fn make_positions(structure: &Bulk, crystal: bool) -> Positions {
    let species = structure.element.symbol();
    let (coordinate_type, rs) = if crystal {
        (PositionCoordinateType::Crystal, structure.fracs.clone())
    } else {
        (
            PositionCoordinateType::AngstromCartesian,
            structure.cartesian_positions(),
        )
    };

    Positions {
        coordinate_type,
        coordinates: rs.into_iter()
            .map(|r| AtomCoordinate {
                species: species.to_string(),
                r,
            })
            .collect(),
    }
}

/// Build the relaxation input for `params` and write it to `file_path`.
pub fn create_relax_pwi<P: AsRef<Path>>(params: &RelaxParams, file_path: P) -> FailResult<()> {
    let file_path = file_path.as_ref();
    let input = relax_input(params)?;
    serialize::write_input_file(&input, file_path)?;
    info!("Wrote {}", file_path.display());

    Ok(())
}

/// Point `ESPRESSO_PSEUDO` at the current working directory.
pub fn set_pseudo_env() -> Result<PathBuf, Error> {
    let cwd = env::current_dir()?;
    env::set_var(PSEUDO_ENV_VAR, &cwd);
    debug!("{}={}", PSEUDO_ENV_VAR, cwd.display());

    Ok(cwd)
}

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "{}", _0)] Bulk(#[cause] bulk::Error),
    #[fail(display = "Unable to determine the working directory: {}", _0)] Io(#[cause] io::Error),
}

impl From<bulk::Error> for Error {
    fn from(e: bulk::Error) -> Error {
        Error::Bulk(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(symbol: &str, a: f64) -> RelaxParams {
        RelaxParams::new(Element::from_symbol(symbol).unwrap(), a, false, false, [2, 2, 2])
    }

    #[test]
    fn pseudopotential_name() {
        assert_eq!(pseudopotential_filename("Cu"), "Cu.pbe-n-kjpaw_psl.1.0.0.UPF");
        assert_eq!(pseudopotential_filename("Si"), "Si.pbe-n-kjpaw_psl.1.0.0.UPF");
    }

    #[test]
    fn relaxation_directives() {
        let input = relax_input(&params("Cu", 3.61)).unwrap();
        assert_eq!(input.control.calculation, Calculation::VcRelax);
        assert_eq!(input.control.tstress, Some(true));
        assert_eq!(input.control.tprnfor, Some(true));
        assert_eq!(input.cell_dofree, Some(CellDoFree::Ibrav));
        assert_eq!(
            input.k_points,
            KPoints::Automatic {
                grid: [2, 2, 2],
                offset: [0, 0, 0],
            }
        );
        assert_eq!(input.species.len(), 1);
        assert_eq!(input.species[0].mass, 63.546);
    }

    #[test]
    fn crystal_coordinates() {
        let mut p = params("Si", 5.43);
        p.crystal = true;
        let input = relax_input(&p).unwrap();
        assert_eq!(input.positions.coordinate_type, PositionCoordinateType::Crystal);
        assert_eq!(input.positions.coordinates[1].r, [0.25, 0.25, 0.25]);

        p.crystal = false;
        let input = relax_input(&p).unwrap();
        assert_eq!(
            input.positions.coordinate_type,
            PositionCoordinateType::AngstromCartesian
        );
        for x in &input.positions.coordinates[1].r {
            assert!((x - 5.43 / 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn unsupported_element_propagates() {
        match relax_input(&params("O", 3.0)) {
            Err(Error::Bulk(bulk::Error::UnsupportedReference(..))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn pseudo_env_is_cwd() {
        let dir = set_pseudo_env().unwrap();
        assert_eq!(env::var_os(PSEUDO_ENV_VAR), Some(dir.into_os_string()));
    }
}
