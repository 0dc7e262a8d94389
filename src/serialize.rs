use std::path::Path;
use std::io;
use std::io::Write;
use std::fs::File;
use failure::Fail;
use crate::input;
use crate::input::{AtomicSpecies, Calculation, CellDoFree, Input, KPoints, LatticeUnits,
                   PositionCoordinateType};

pub fn make_input_file(input: &Input) -> Result<String, Error> {
    input::validate(&input)?;

    let namelists = vec![
        make_control(&input),
        make_system(&input),
        make_namelist("ELECTRONS", Vec::new()),
        make_namelist("IONS", Vec::new()),
        make_cell_namelist(&input),
    ];

    let input_sections = vec![
        namelists.join("\n"),
        make_species(&input.species),
        make_kpoints(&input.k_points),
        make_cell_parameters(&input),
        make_positions(&input),
    ];

    let mut input_text = input_sections.join("\n\n");
    input_text.push('\n');

    Ok(input_text)
}

fn make_namelist(name: &str, fields: Vec<String>) -> String {
    let mut lines = vec![format!("&{}", name)];
    lines.extend(fields);
    lines.push(String::from("/"));

    lines.join("\n")
}

fn make_control(input: &Input) -> String {
    let control = &input.control;
    let mut fields = Vec::new();

    push_field(&mut fields, "calculation", Some(&control.calculation));
    push_field(&mut fields, "tstress", control.tstress.as_ref());
    push_field(&mut fields, "tprnfor", control.tprnfor.as_ref());
    push_field(&mut fields, "pseudo_dir", control.pseudo_dir.as_ref());

    make_namelist("CONTROL", fields)
}

fn make_system(input: &Input) -> String {
    let mut fields = Vec::new();

    // The cell is always given explicitly in CELL_PARAMETERS.
    push_field(&mut fields, "ibrav", Some(&0usize));
    push_field(&mut fields, "nat", Some(&input.positions.coordinates.len()));
    push_field(&mut fields, "ntyp", Some(&input.species.len()));
    push_field(&mut fields, "ecutwfc", input.system.ecutwfc.as_ref());
    push_field(&mut fields, "ecutrho", input.system.ecutrho.as_ref());

    make_namelist("SYSTEM", fields)
}

fn make_cell_namelist(input: &Input) -> String {
    let mut fields = Vec::new();

    push_field(&mut fields, "cell_dofree", input.cell_dofree.as_ref());

    make_namelist("CELL", fields)
}

fn push_field<F: Field + ?Sized>(lines: &mut Vec<String>, name: &str, value: Option<&F>) {
    if let Some(value) = value {
        lines.push(format!("   {:16} = {}", name, value.value()));
    }
}

fn make_species(species: &[AtomicSpecies]) -> String {
    let mut lines = vec![String::from("ATOMIC_SPECIES")];

    for s in species {
        lines.push(format!("{} {} {}", s.species, s.mass, s.pseudopotential));
    }

    lines.join("\n")
}

fn make_kpoints(k_points: &KPoints) -> String {
    match *k_points {
        KPoints::Gamma => String::from("K_POINTS gamma"),
        KPoints::Automatic { grid, offset } => format!(
            "K_POINTS automatic\n{} {} {}  {} {} {}",
            grid[0], grid[1], grid[2], offset[0], offset[1], offset[2]
        ),
    }
}

fn make_cell_parameters(input: &Input) -> String {
    let cell = &input.cell;
    let mut lines = vec![format!("CELL_PARAMETERS {}", cell.units.value())];

    for a in &cell.cell {
        lines.push(format!(
            "{:.14} {:.14} {:.14}",
            positive_zero(a[0]),
            positive_zero(a[1]),
            positive_zero(a[2])
        ));
    }

    lines.join("\n")
}

fn make_positions(input: &Input) -> String {
    let pos = &input.positions;
    let mut lines = vec![format!("ATOMIC_POSITIONS {}", pos.coordinate_type.value())];

    for coord in &pos.coordinates {
        let r = &coord.r;
        lines.push(format!(
            "{} {:.10} {:.10} {:.10}",
            coord.species,
            positive_zero(r[0]),
            positive_zero(r[1]),
            positive_zero(r[2])
        ));
    }

    lines.join("\n")
}

/// Maps -0.0 to 0.0, so that rounding never prints "-0.000...".
fn positive_zero(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

pub fn write_input_file<P: AsRef<Path>>(input: &Input, file_path: P) -> Result<(), Error> {
    let input_text = make_input_file(input)?;

    let mut file = File::create(file_path)?;
    file.write_all(input_text.as_bytes())?;

    Ok(())
}

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "{}", _0)] Input(input::ErrorList),
    #[fail(display = "{}", _0)] Io(#[cause] io::Error),
}

impl From<input::ErrorList> for Error {
    fn from(errs: input::ErrorList) -> Error {
        Error::Input(errs)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

/// A `Field` has a method `value()` which returns its textual representation on the
/// right-hand side of a `field_name = value` expression in a pw.x namelist, or
/// the option following a card name.
pub trait Field {
    fn value(&self) -> String;
}

impl Field for bool {
    fn value(&self) -> String {
        String::from(if *self { ".true." } else { ".false." })
    }
}

impl Field for usize {
    fn value(&self) -> String {
        format!("{}", self)
    }
}

impl Field for f64 {
    fn value(&self) -> String {
        format!("{:?}", self)
    }
}

impl Field for String {
    fn value(&self) -> String {
        format!("'{}'", self.replace('\'', "''"))
    }
}

impl Field for Calculation {
    fn value(&self) -> String {
        String::from(match *self {
            Calculation::Scf => "'scf'",
            Calculation::Relax => "'relax'",
            Calculation::VcRelax => "'vc-relax'",
        })
    }
}

impl Field for CellDoFree {
    fn value(&self) -> String {
        String::from(match *self {
            CellDoFree::All => "'all'",
            CellDoFree::Ibrav => "'ibrav'",
            CellDoFree::Shape => "'shape'",
            CellDoFree::Volume => "'volume'",
        })
    }
}

impl Field for LatticeUnits {
    fn value(&self) -> String {
        String::from(match *self {
            LatticeUnits::Bohr => "bohr",
            LatticeUnits::Angstrom => "angstrom",
        })
    }
}

impl Field for PositionCoordinateType {
    fn value(&self) -> String {
        String::from(match *self {
            PositionCoordinateType::BohrCartesian => "bohr",
            PositionCoordinateType::AngstromCartesian => "angstrom",
            PositionCoordinateType::Crystal => "crystal",
        })
    }
}
