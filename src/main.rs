use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use sysglance::commands;

fn main() -> Result<()> {
    sysglance::init_logging();

    let matches = Command::new("sysglance")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live hardware telemetry snapshots")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("snapshot")
                .about("Collect one telemetry snapshot and print it")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print machine-readable JSON instead of the terminal view")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Poll repeatedly until Ctrl-C")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Seconds between polls (minimum 1)")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("2"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print one JSON document per poll")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("snapshot", sub_matches)) => commands::snapshot::execute(sub_matches),
        Some(("watch", sub_matches)) => commands::watch::execute(sub_matches),
        _ => unreachable!("subcommand required"),
    }
}
