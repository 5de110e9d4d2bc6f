use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use lf_circuit::{GateKind, TemplateRegistry};
use lf_sim::{Scheduler, SimOptions, run_ticks};

mod error;
mod files;

use error::{AppError, AppResult};

#[derive(Parser)]
#[command(name = "lf-cli")]
#[command(about = "LogicFlow CLI - digital logic circuit tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the component templates
    Templates,
    /// List the components of a circuit file
    Inspect {
        /// Path to a .bin, .yaml/.yml or .json circuit file
        path: PathBuf,
    },
    /// Run ticks and print LED states
    Simulate {
        /// Path to a .bin, .yaml/.yml or .json circuit file
        path: PathBuf,
        /// Number of ticks to run
        #[arg(long, default_value_t = 1)]
        ticks: usize,
        /// Drive a switch before running, as COMPONENT_INDEX=0|1 (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(usize, bool)>,
        /// Sleep one tick period between ticks
        #[arg(long)]
        realtime: bool,
        /// Report per-tick wall time
        #[arg(long)]
        timing: bool,
    },
    /// Convert a circuit file to another format
    Convert {
        /// Input file
        input: PathBuf,
        /// Output file; the format follows the extension
        output: PathBuf,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let registry = TemplateRegistry::standard();

    match cli.command {
        Commands::Templates => cmd_templates(&registry),
        Commands::Inspect { path } => cmd_inspect(&path, &registry),
        Commands::Simulate {
            path,
            ticks,
            set,
            realtime,
            timing,
        } => {
            if timing {
                lf_core::timing::enable_timing();
            }
            cmd_simulate(&path, &registry, ticks, &set, realtime)
        }
        Commands::Convert { input, output } => cmd_convert(&input, &output, &registry),
    }
}

fn parse_assignment(s: &str) -> Result<(usize, bool), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=0|1, got '{s}'"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad component index '{index}': {e}"))?;
    let value = match value.trim() {
        "0" => false,
        "1" => true,
        other => return Err(format!("bad switch value '{other}', expected 0 or 1")),
    };
    Ok((index, value))
}

fn cmd_templates(registry: &TemplateRegistry) -> AppResult<()> {
    println!("Templates:");
    for template in registry.iter() {
        println!(
            "  {:>3}  {:<8} {:<6} {}x{}  {} in / {} out",
            template.id.get(),
            template.name,
            template.kind,
            template.bounds.width,
            template.bounds.height,
            template.inputs.len(),
            template.outputs.len()
        );
    }
    Ok(())
}

fn cmd_inspect(path: &Path, registry: &TemplateRegistry) -> AppResult<()> {
    let loaded = files::load(path, registry)?;
    let circuit = &loaded.circuit;
    println!("Circuit: {}", loaded.name);

    if loaded.ids.is_empty() {
        println!("No components");
        return Ok(());
    }
    for (index, &id) in loaded.ids.iter().enumerate() {
        let Some(comp) = circuit.component(id) else {
            continue;
        };
        let pos = comp.position();
        println!(
            "  [{index}] {} (template {}) at ({}, {}), feeds {} component(s)",
            comp.kind,
            comp.template,
            pos.x,
            pos.y,
            comp.downstream().len()
        );
    }
    println!("  {} wire(s)", circuit.wires().count());
    Ok(())
}

fn cmd_simulate(
    path: &Path,
    registry: &TemplateRegistry,
    ticks: usize,
    assignments: &[(usize, bool)],
    realtime: bool,
) -> AppResult<()> {
    let files::Loaded {
        name,
        mut circuit,
        ids,
    } = files::load(path, registry)?;
    circuit.set_muted(true);

    for &(index, value) in assignments {
        let id = *ids.get(index).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "component index {index} out of range ({} components)",
                ids.len()
            ))
        })?;
        circuit.set_switch(id, value)?;
    }

    let opts = SimOptions {
        max_ticks: ticks,
        realtime,
        ..SimOptions::default()
    };
    let mut scheduler = Scheduler::compute(&circuit);
    let record = run_ticks(&mut circuit, &mut scheduler, &opts)?;

    println!("Simulated {name} for {ticks} tick(s)");
    if let Some(stats) = record.timing {
        println!(
            "  tick time: mean {:.1} us, max {:.1} us",
            stats.mean().as_secs_f64() * 1e6,
            stats.max().as_secs_f64() * 1e6
        );
    }
    let mut leds = 0;
    for (index, &id) in ids.iter().enumerate() {
        let Some(comp) = circuit.component(id) else {
            continue;
        };
        if comp.kind != GateKind::Led {
            continue;
        }
        leds += 1;
        let lit = circuit.led_lit(id).unwrap_or(false);
        println!("  [{index}] LED {}", if lit { "on" } else { "off" });
    }
    if leds == 0 {
        println!("  (no LEDs)");
    }
    Ok(())
}

fn cmd_convert(input: &Path, output: &Path, registry: &TemplateRegistry) -> AppResult<()> {
    let loaded = files::load(input, registry)?;
    files::save(output, &loaded.name, &loaded.circuit, registry)?;
    println!(
        "✓ Converted {} -> {} ({} components)",
        input.display(),
        output.display(),
        loaded.ids.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assignment_accepts_bits() {
        assert_eq!(parse_assignment("3=1"), Ok((3, true)));
        assert_eq!(parse_assignment(" 0 = 0 "), Ok((0, false)));
    }

    #[test]
    fn parse_assignment_rejects_garbage() {
        assert!(parse_assignment("3").is_err());
        assert!(parse_assignment("x=1").is_err());
        assert!(parse_assignment("1=on").is_err());
    }
}
