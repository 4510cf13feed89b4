//! lvsim - Low-voltage installation diagram simulator
//!
//! Loads a diagram, optionally applies device actions, runs the simulation
//! and prints the outcome.
//!
//! # Usage
//!
//! ```bash
//! lvsim kitchen.json --action rcd=test --settle --json > result.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use lv_circuit_core::{
    diagram::validate_diagram,
    error::Result,
    Diagram, DeviceAction, SimulationResult, Simulator, SimulatorConfig,
};
use tracing_subscriber::EnvFilter;

/// Low-voltage installation diagram simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the diagram file (.json)
    #[arg(value_name = "DIAGRAM_FILE")]
    diagram_file: PathBuf,

    /// Recompute until protective devices stop tripping
    #[arg(short, long)]
    settle: bool,

    /// Maximum recompute cycles when settling
    #[arg(long, default_value_t = lv_circuit_core::engine::DEFAULT_MAX_SETTLE_CYCLES)]
    max_cycles: usize,

    /// Apply a device action before simulating, e.g. `mcb-1=toggle`
    #[arg(short, long = "action", value_name = "ID=ACTION", value_parser = parse_action)]
    actions: Vec<(String, DeviceAction)>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Write the diagram back with latched trips and applied actions
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_action(s: &str) -> std::result::Result<(String, DeviceAction), String> {
    let (id, action) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=ACTION, got '{s}'"))?;
    let action = action.parse::<DeviceAction>().map_err(|e| e.to_string())?;
    Ok((id.to_string(), action))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(diagram: &Diagram, result: &SimulationResult) {
    for message in result.messages() {
        println!("FAULT     {message}");
    }
    for inst in &diagram.components {
        let mut flags = Vec::new();
        if result.energized.contains(&inst.id) {
            flags.push("energized");
        }
        if inst.device.latch().is_some_and(|l| l.is_tripped()) {
            flags.push("tripped");
        }
        if flags.is_empty() {
            continue;
        }
        match inst.watts().filter(|_| result.energized.contains(&inst.id)) {
            Some(watts) => println!("{:<9} {} ({}) {watts} W", flags.join(","), inst.id, inst.display_name()),
            None => println!("{:<9} {} ({})", flags.join(","), inst.id, inst.display_name()),
        }
    }
    let load: f64 = diagram
        .components
        .iter()
        .filter(|inst| result.energized.contains(&inst.id))
        .filter_map(|inst| inst.watts())
        .sum();
    if load > 0.0 {
        println!("LOAD      {load} W");
    }
    for (wire, flow) in &result.flows {
        let direction = if flow.forward { "->" } else { "<-" };
        println!("FLOW      {wire} {} {direction}", flow.role);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Load and check the diagram
    let diagram = Diagram::from_file(&args.diagram_file)?;
    validate_diagram(&diagram)?;

    // Create simulator
    let config = SimulatorConfig::new().with_max_settle_cycles(args.max_cycles);
    let mut simulator = Simulator::with_config(diagram, config);

    for (id, action) in &args.actions {
        simulator.apply(id, *action)?;
    }

    let result = if args.settle {
        simulator.settle()
    } else {
        simulator.recompute()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(simulator.diagram(), &result);
    }

    if let Some(path) = &args.output {
        simulator.diagram().save(path)?;
    }

    Ok(())
}
