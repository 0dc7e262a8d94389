#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::process;
use clap::{App, Arg};
use qe_relax::config::Config;
use qe_relax::{relax, FailResult};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        for cause in e.iter_causes() {
            error!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn run() -> FailResult<()> {
    let matches = App::new("relax-pwi")
        .version(crate_version!())
        .about("Write a pw.x vc-relax input file for an elemental bulk crystal.")
        .arg(
            Arg::with_name("config")
                .help("YAML file with element, lattice_param, cubic, crystal and kpts")
                .default_value("structure.yml")
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Path of the generated input file")
                .short("o")
                .long("output")
                .value_name("FILE")
                .takes_value(true)
                .default_value("relax.pwi"),
        )
        .arg(
            Arg::with_name("no-pseudo-env")
                .help("Do not point ESPRESSO_PSEUDO at the working directory")
                .long("no-pseudo-env"),
        )
        .get_matches();

    let config_path = matches.value_of("config").unwrap_or("structure.yml");
    let output_path = matches.value_of("output").unwrap_or("relax.pwi");

    if !matches.is_present("no-pseudo-env") {
        let dir = relax::set_pseudo_env()?;
        info!("{}={}", relax::PSEUDO_ENV_VAR, dir.display());
    }

    let params = Config::from_path(config_path)?.to_params()?;
    relax::create_relax_pwi(&params, output_path)?;

    Ok(())
}
