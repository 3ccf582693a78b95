/*
cadnano, a design engine for DNA nanostructures.
    Copyright (C) 2021  Nicolas Levy <nicolaspierrelevy@gmail.com> and Nicolas Schabanel <nicolas.schabanel@ens-lyon.fr>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Command line inspector of cadnano designs.
//!
//! `cadnano <design.json>` prints a summary of a design.
//! `cadnano <design.json> <helix> <base>` prints the potential cross-overs of a base as JSON.

use cadnano_design::{Collection, Design};
use std::env;
use std::error::Error;
use std::path::Path;

const USAGE: &str = "usage: cadnano <design.json> [<helix> <base>]";

fn main() {
    pretty_env_logger::init();
    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(args.get(1..).unwrap_or_default()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    match args {
        [path] => {
            let design = load_design(path)?;
            print!("{}", summary(&design));
            Ok(())
        }
        [path, helix, base] => {
            let design = load_design(path)?;
            let helix: usize = helix.parse()?;
            let base: isize = base.parse()?;
            let xovers = design.potential_crossovers(helix, base)?;
            println!("{}", serde_json::to_string_pretty(&xovers)?);
            Ok(())
        }
        _ => Err(USAGE.into()),
    }
}

fn load_design<P: AsRef<Path>>(path: P) -> Result<Design, Box<dyn Error>> {
    let json_str = std::fs::read_to_string(path.as_ref())?;
    let design = serde_json::from_str(&json_str)?;
    log::info!("Loaded {}", path.as_ref().display());
    Ok(design)
}

fn summary(design: &Design) -> String {
    use std::fmt::Write;
    let mut ret = String::new();
    writeln!(&mut ret, "{} lattice", design.lattice_type()).unwrap_or_default();
    write!(&mut ret, "{}", design.parameters().formated_string()).unwrap_or_default();
    for helix in design.helices().values() {
        writeln!(
            &mut ret,
            "helix {} at {}: {} bases, {} insertions",
            helix.id_num,
            helix.coord,
            helix.length,
            helix.insertions().len()
        )
        .unwrap_or_default();
    }
    for oligo in design.oligos() {
        writeln!(&mut ret, "{}", design.strands().formated_oligo(&oligo)).unwrap_or_default();
    }
    ret
}
