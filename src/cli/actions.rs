//! Subcommand actions

use anyhow::{bail, Context, Result};
use clap::ArgMatches;

use crate::core::{MarkStatus, Project, ResultStore};
use crate::engine::{ConsolePrompt, TestOrchestrator};
use crate::hardware::{sim::SimulatedBus, ExpanderPin};

/// `loomcheck run`: probe every unresolved terminal of one mark.
///
/// The binary drives the engine against the simulated pin bus; a real
/// deployment embeds the engine with its own `PinBus` implementation on
/// top of the actual I2C transport.
pub async fn run(matches: &ArgMatches) -> Result<()> {
    let project = Project::new(matches.get_one::<String>("project").unwrap());
    let mark = matches.get_one::<String>("mark").unwrap();

    let config = project.load_config()?;
    let graph = project.load_graph()?;
    let iomap = project.load_iomap()?;
    let results_path = project.results_path();
    let mut store = ResultStore::load(&results_path)?;

    let bus = SimulatedBus::new(config.sense_pin);
    match matches.get_one::<String>("wired") {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read wiring file '{path}'"))?;
            let pairs: Vec<(u8, u8)> =
                serde_json::from_str(&json).context("Failed to deserialize wiring file")?;
            for (address, pin) in pairs {
                bus.wire(ExpanderPin::new(address, pin));
            }
        }
        None => {
            // Happy-path simulation: every expected line is wired through.
            for binding in iomap.all_bindings() {
                bus.wire(binding.expander());
            }
        }
    }

    let prompt = ConsolePrompt::new();
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);
    let summary = orchestrator
        .run_mark(mark, &graph, &iomap, &mut store, &results_path)
        .await?;

    println!(
        "Mark {mark}: {} probed, {} passed, {} failed, {} skipped",
        summary.probed, summary.passed, summary.failed, summary.skipped
    );
    Ok(())
}

/// `loomcheck init`: create the empty result store for a cabinet.
pub fn init(matches: &ArgMatches) -> Result<()> {
    let project = Project::new(matches.get_one::<String>("project").unwrap());
    let cabinet = matches.get_one::<String>("cabinet").unwrap();

    let results_path = project.results_path();
    if results_path.exists() && !matches.get_flag("force") {
        bail!("Result store already exists at {results_path:?}; pass --force to overwrite");
    }

    let graph = project.load_graph()?;
    let marks: Vec<String> = match matches.get_many::<String>("marks") {
        Some(selected) => {
            let selected: Vec<String> = selected.cloned().collect();
            for mark in &selected {
                if graph.connections_for(mark).is_none() {
                    log::warn!("Mark '{mark}' is not in the connection graph");
                }
            }
            selected
        }
        None => graph.marks().map(str::to_string).collect(),
    };

    let store = ResultStore::empty(cabinet.clone(), marks);
    store.save(&results_path)?;
    println!(
        "Created result store for cabinet '{cabinet}' with {} marks at {results_path:?}",
        store.test_results.len()
    );
    Ok(())
}

/// `loomcheck report`: print the cabinet result tree.
pub fn report(matches: &ArgMatches) -> Result<()> {
    let project = Project::new(matches.get_one::<String>("project").unwrap());
    let store = ResultStore::load(&project.results_path())?;

    println!("{}", store.cabinet_name);
    for (mark, results) in &store.test_results {
        println!("{} {mark}", MarkStatus::of(results).icon());
        for result in results {
            let icon = if result.passed { "✅" } else { "❌" };
            println!("  {icon} Terminal {}", result.terminal);
            if !result.passed {
                println!("     {}", result.answer);
            }
        }
    }
    Ok(())
}
