//! Generate Quantum ESPRESSO `pw.x` input files for variable-cell relaxation
//! of elemental bulk crystals.

extern crate failure;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_ignored;
extern crate serde_yaml;
#[macro_use]
extern crate log;

pub mod bulk;
pub mod config;
pub mod element;
pub mod error;
pub mod input;
pub mod relax;
pub mod serialize;

pub use crate::relax::{create_relax_pwi, pseudopotential_filename, relax_input, RelaxParams};

pub type FailResult<T> = Result<T, failure::Error>;
