//! The YAML configuration file read by `relax-pwi`.
//!
//! ```yaml
//! element: Cu
//! lattice_param: 3.61
//! cubic: False
//! crystal: False
//! kpts: 2,2,2
//! ```
//!
//! `kpts` may also be written as a YAML list, and the booleans as strings
//! (`"True"`, `"no"`, ...). Unknown keys produce a warning, not an error.

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use failure::Fail;
use crate::bulk::CrystalStructure;
use crate::element::{Element, ElementParseError};
use crate::relax::RelaxParams;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub element: String,
    pub lattice_param: Number,
    #[serde(default)]
    pub cubic: Flag,
    #[serde(default)]
    pub crystal: Flag,
    pub kpts: Grid,

    #[serde(default)]
    pub koffset: Option<Grid>,
    #[serde(default)]
    pub crystalstructure: Option<CrystalStructure>,
    #[serde(default)]
    pub covera: Option<f64>,
    #[serde(default)]
    pub ecutwfc: Option<f64>,
    #[serde(default)]
    pub ecutrho: Option<f64>,
    #[serde(default)]
    pub pseudo_dir: Option<String>,
}

/// A float which may also be written as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Value(f64),
    Text(String),
}

/// A boolean which may also be written as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Value(bool),
    Text(String),
}

impl Default for Flag {
    fn default() -> Flag {
        Flag::Value(false)
    }
}

/// Three integers, either comma-separated in a string or as a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Grid {
    List(Vec<u64>),
    Text(String),
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Open(path.display().to_string(), e))?;
        Config::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut r: R) -> Result<Config, Error> {
        let mut s = String::new();
        r.read_to_string(&mut s)?;
        Config::from_str(&s)
    }

    pub fn from_str(s: &str) -> Result<Config, Error> {
        // Go through a Value first so that unknown keys can be reported as
        // warnings. On failure, re-parse from the string; errors from the
        // Value path lose their location information.
        let value: serde_yaml::Value = serde_yaml::from_str(s)?;

        match serde_ignored::deserialize(value, |path| {
            warn!("Unused config item (possible typo?): {}", path)
        }) {
            Ok(config) => Ok(config),
            Err(e) => match serde_yaml::from_str::<Config>(s) {
                Err(better) => Err(better.into()),
                Ok(_) => Err(e.into()),
            },
        }
    }

    pub fn to_params(&self) -> Result<RelaxParams, Error> {
        let element = Element::from_symbol(self.element.trim())?;
        let lattice_param = self.lattice_param.to_f64("lattice_param")?;
        let cubic = self.cubic.to_bool("cubic")?;
        let crystal = self.crystal.to_bool("crystal")?;
        let kpts = self.kpts.to_kpts()?;
        let koffset = match self.koffset {
            Some(ref grid) => grid.to_offset()?,
            None => [0, 0, 0],
        };

        let params = RelaxParams {
            element,
            lattice_param,
            cubic,
            crystal,
            kpts,
            koffset,
            crystalstructure: self.crystalstructure,
            covera: self.covera,
            ecutwfc: self.ecutwfc,
            ecutrho: self.ecutrho,
            pseudo_dir: self.pseudo_dir.clone(),
        };
        debug!("{:?}", params);

        Ok(params)
    }
}

impl Number {
    fn to_f64(&self, key: &'static str) -> Result<f64, Error> {
        match *self {
            Number::Value(x) => Ok(x),
            Number::Text(ref s) => s.trim()
                .parse()
                .map_err(|_| Error::Number(key, s.clone())),
        }
    }
}

impl Flag {
    fn to_bool(&self, key: &'static str) -> Result<bool, Error> {
        match *self {
            Flag::Value(b) => Ok(b),
            Flag::Text(ref s) => parse_flag(s).ok_or_else(|| Error::Flag(key, s.clone())),
        }
    }
}

impl Grid {
    fn to_kpts(&self) -> Result<[u64; 3], Error> {
        let grid = match *self {
            Grid::List(ref v) => list_to_triple(v, "kpts")?,
            Grid::Text(ref s) => return parse_kpts(s),
        };
        if grid.iter().any(|&n| n == 0) {
            return Err(Error::KPoints(format!("{:?}", grid)));
        }
        Ok(grid)
    }

    fn to_offset(&self) -> Result<[u64; 3], Error> {
        let offset = match *self {
            Grid::List(ref v) => list_to_triple(v, "koffset")?,
            Grid::Text(ref s) => parse_triple(s).ok_or_else(|| Error::Triple("koffset", s.clone()))?,
        };
        if offset.iter().any(|&o| o > 1) {
            return Err(Error::KOffset(offset));
        }
        Ok(offset)
    }
}

/// Parse a Monkhorst-Pack grid written as `"n1,n2,n3"`.
pub fn parse_kpts(s: &str) -> Result<[u64; 3], Error> {
    match parse_triple(s) {
        Some(grid) if grid.iter().all(|&n| n > 0) => Ok(grid),
        _ => Err(Error::KPoints(s.to_string())),
    }
}

fn parse_triple(s: &str) -> Option<[u64; 3]> {
    let parts = s.split(',')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.len() == 3 {
        Some([parts[0], parts[1], parts[2]])
    } else {
        None
    }
}

fn list_to_triple(v: &[u64], key: &'static str) -> Result<[u64; 3], Error> {
    if v.len() == 3 {
        Ok([v[0], v[1], v[2]])
    } else {
        Err(Error::Triple(key, format!("{:?}", v)))
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "Unable to open config file {}: {}", _0, _1)] Open(String, #[cause] io::Error),
    #[fail(display = "{}", _0)] Io(#[cause] io::Error),
    #[fail(display = "{}", _0)] Yaml(#[cause] serde_yaml::Error),
    #[fail(display = "{}", _0)] Element(#[cause] ElementParseError),
    #[fail(display = "`{}` must be a number, got {:?}.", _0, _1)] Number(&'static str, String),
    #[fail(display = "`{}` must be a boolean, got {:?}.", _0, _1)] Flag(&'static str, String),
    #[fail(display = "`kpts` must be three positive comma-separated integers, got {:?}.", _0)]
    KPoints(String),
    #[fail(display = "`{}` must be three integers, got {}.", _0, _1)] Triple(&'static str, String),
    #[fail(display = "`koffset` entries must be 0 or 1, got {:?}.", _0)] KOffset([u64; 3]),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Error {
        Error::Yaml(e)
    }
}

impl From<ElementParseError> for Error {
    fn from(e: ElementParseError) -> Error {
        Error::Element(e)
    }
}
