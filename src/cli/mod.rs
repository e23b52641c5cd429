//! CLI command tree and dispatch

pub mod actions;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

fn project_arg() -> Arg {
    Arg::new("project")
        .long("project")
        .short('p')
        .value_name("DIR")
        .default_value(".")
        .help("Project directory holding connections.json, iomap.json and test_results.json")
}

/// Parse command line arguments.
pub fn parse_args() -> ArgMatches {
    Command::new("loomcheck")
        .about("Continuity test engine for electrical cabinet wiring looms")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run the continuity test for one mark")
                .arg(project_arg())
                .arg(
                    Arg::new("mark")
                        .value_name("MARK")
                        .required(true)
                        .help("Mark to test, e.g. 10CON1"),
                )
                .arg(
                    Arg::new("wired")
                        .long("wired")
                        .value_name("FILE")
                        .help(
                            "Simulation wiring: JSON array of [address, pin] pairs that are \
                             live. Without this, every expected binding is wired",
                        ),
                ),
        )
        .subcommand(
            Command::new("init")
                .about("Create the empty result store for a cabinet")
                .arg(project_arg())
                .arg(
                    Arg::new("cabinet")
                        .long("cabinet")
                        .value_name("NAME")
                        .required(true)
                        .help("Cabinet name recorded in the result store"),
                )
                .arg(
                    Arg::new("marks")
                        .long("marks")
                        .value_name("MARKS")
                        .value_delimiter(',')
                        .help("Restrict to these marks (default: every mark in the graph)"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(clap::ArgAction::SetTrue)
                        .help("Overwrite an existing result store"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Print the cabinet result tree")
                .arg(project_arg()),
        )
        .get_matches()
}

/// Dispatch the parsed subcommand.
pub async fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("run", sub)) => actions::run(sub).await,
        Some(("init", sub)) => actions::init(sub),
        Some(("report", sub)) => actions::report(sub),
        _ => unreachable!("subcommand is required"),
    }
}
