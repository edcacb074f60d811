use branchsat::formula::{dimacs, notation};
use branchsat::*;
use clap::{crate_version, App, Arg, ArgMatches};
use std::fs::File;
use std::io::Read;

fn main() {
    env_logger::init();

    let matches = App::new("branchsat")
        .version(crate_version!())
        .about("Decides satisfiability of a CNF formula by exhaustive branching")
        .arg(
            Arg::with_name("INPUT")
                .help("input file (bracket notation such as \"[a b]-[.a]\", or DIMACS with --dimacs)")
                .index(1),
        )
        .arg(
            Arg::with_name("formula")
                .short("f")
                .long("formula")
                .takes_value(true)
                .value_name("TEXT")
                .conflicts_with("INPUT")
                .help("formula in bracket notation, given inline"),
        )
        .arg(Arg::with_name("dimacs").short("d").long("dimacs").help("read input as DIMACS CNF"))
        .arg(Arg::with_name("stats").short("s").long("stats").help("print search statistics to stderr"))
        .get_matches();

    match read_formula(&matches) {
        Ok(f) => {
            let mut solver = Solver::new(f);
            let result = solver.solve();

            if matches.is_present("stats") {
                let stats = solver.stats();
                eprintln!(
                    "branches: {}, backtracks: {}, max depth: {}",
                    stats.branches, stats.backtracks, stats.max_depth
                );
            }

            let exit_code = match result {
                SatResult::Satisfiable(model) => {
                    println!("SAT");
                    for (name, value) in model.iter() {
                        println!("{} = {}", name, value);
                    }
                    0
                }
                SatResult::Unsatisfiable => {
                    println!("UNSAT");
                    1
                }
            };
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(-1);
        }
    }
}

fn read_formula(matches: &ArgMatches) -> Result<Formula, ParseError> {
    if let Some(text) = matches.value_of("formula") {
        return notation::parse_str(text);
    }
    let as_dimacs = matches.is_present("dimacs");
    match matches.value_of("INPUT") {
        Some(path) => parse_with(File::open(path)?, as_dimacs),
        None => parse_with(std::io::stdin(), as_dimacs),
    }
}

fn parse_with<R: Read>(reader: R, as_dimacs: bool) -> Result<Formula, ParseError> {
    if as_dimacs {
        dimacs::parse(reader)
    } else {
        notation::parse(reader)
    }
}
