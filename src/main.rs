//! Dispatch simulator entry point — CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use dispatch_sim::config::ScenarioConfig;
use dispatch_sim::generator::synthetic_incidents;
use dispatch_sim::io::export::export_csv;
use dispatch_sim::loader::load_incidents;
use dispatch_sim::model::Incident;
use dispatch_sim::optimizer::optimize_station_layout;
use dispatch_sim::sim::engine::SimulationEngine;
use dispatch_sim::sim::registry::StationRegistry;
use dispatch_sim::sim::report::SummaryReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    incidents_path: Option<String>,
    seed_override: Option<u64>,
    optimize_stations: bool,
    out_path: Option<String>,
    quiet: bool,
}

fn print_help() {
    eprintln!("dispatch-sim — City emergency dispatch simulator");
    eprintln!();
    eprintln!("Usage: dispatch-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in preset (baseline, sparse_coverage)");
    eprintln!("  --incidents <path>    Load incidents from CSV instead of generating them");
    eprintln!("  --seed <u64>          Override random seed");
    eprintln!("  --optimize-stations   Relocate stations via weighted k-means before running");
    eprintln!("  --out <path>          Export the per-incident outcome log to CSV");
    eprintln!("  --quiet               Suppress per-incident log lines");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        incidents_path: None,
        seed_override: None,
        optimize_stations: false,
        out_path: None,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--incidents" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --incidents requires a path argument");
                    process::exit(1);
                }
                cli.incidents_path = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--optimize-stations" => {
                cli.optimize_stations = true;
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.out_path = Some(args[i].clone());
            }
            "--quiet" => {
                cli.quiet = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads incidents from CSV when a path is given, otherwise generates a
/// seeded synthetic stream.
fn load_or_generate(cli: &CliArgs, scenario: &ScenarioConfig) -> Vec<Incident> {
    if let Some(ref path) = cli.incidents_path {
        match load_incidents(Path::new(path), &scenario.simulation) {
            Ok(incidents) => incidents,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        synthetic_incidents(&scenario.generator, &scenario.simulation)
    }
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply seed override
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let registry = match scenario.station_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let incidents = load_or_generate(&cli, &scenario);

    // Optionally relocate stations from the incident history before running
    let registry = if cli.optimize_stations {
        let optimized = optimize_station_layout(
            registry.stations(),
            &incidents,
            scenario.simulation.grid_size,
            scenario.simulation.seed,
        );
        for s in &optimized {
            eprintln!(
                "station {} moved to ({:.1}, {:.1})",
                s.label, s.location.x, s.location.y
            );
        }
        StationRegistry::new(optimized)
    } else {
        registry
    };

    let mut engine = SimulationEngine::new(
        registry,
        incidents,
        scenario.dispatch.to_weights(),
        scenario.engine_params(),
    );
    if let Err(e) = engine.run() {
        eprintln!("{e}");
        process::exit(1);
    }

    // Print per-incident outcomes
    if !cli.quiet {
        for outcome in engine.outcomes() {
            println!("{outcome}");
        }
    }

    // Print summary report
    let report = SummaryReport::from_outcomes(engine.outcomes());
    println!("\n{report}");

    // Export CSV if requested
    if let Some(ref path) = cli.out_path {
        if let Err(e) = export_csv(engine.outcomes(), Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Outcome log written to {path}");
    }
}
