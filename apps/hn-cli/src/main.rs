use clap::{Parser, Subcommand};
use hn_project::{ProjectResult, compile, load};
use hn_sim::{ReportFrame, run_sim};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hn-cli")]
#[command(about = "Hydronet CLI - chilled and condenser water loop simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax, names and references
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Run a simulation and write the report as CSV
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the stored duration [hr]
        #[arg(long)]
        hours: Option<f64>,
        /// Override the stored time step [hr]
        #[arg(long)]
        dt: Option<f64>,
        /// Evaluate nodes in parallel
        #[arg(long)]
        parallel: bool,
    },
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Run {
            project_path,
            output,
            hours,
            dt,
            parallel,
        } => cmd_run(&project_path, output.as_deref(), hours, dt, parallel),
    }
}

fn cmd_validate(project_path: &Path) -> ProjectResult<()> {
    eprintln!("Validating project: {}", project_path.display());
    let project = load(project_path)?;
    // Compiling also checks links and component parameters.
    let compiled = compile(&project)?;
    eprintln!(
        "✓ Project '{}' is valid ({} nodes, {} elements, {} plants)",
        project.name,
        compiled.network.node_count(),
        compiled.network.elements().len(),
        compiled.network.plants().len()
    );
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    output: Option<&Path>,
    hours: Option<f64>,
    dt: Option<f64>,
    parallel: bool,
) -> ProjectResult<()> {
    let project = load(project_path)?;
    let mut compiled = compile(&project)?;
    if let Some(hours) = hours {
        compiled.options.duration_hours = hours;
    }
    if let Some(dt) = dt {
        compiled.options.dt_hours = dt;
    }
    compiled.options.parallel |= parallel;
    debug!(options = ?compiled.options, "run options resolved");

    eprintln!("Running '{}'", project.name);
    eprintln!(
        "  dt = {} hr, duration = {} hr",
        compiled.options.dt_hours, compiled.options.duration_hours
    );
    let started = Instant::now();
    let frame = run_sim(&mut compiled.network, &compiled.options)?;
    eprintln!(
        "✓ Simulation completed in {:.2}s ({} rows, {} columns)",
        started.elapsed().as_secs_f64(),
        frame.len(),
        frame.columns.len()
    );

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_csv(&frame, &mut BufWriter::new(file))?;
            eprintln!("  Report written to {}", path.display());
        }
        None => write_csv(&frame, &mut io::stdout().lock())?,
    }
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One header row (`object name [unit]`), then one row per recorded time.
fn write_csv(frame: &ReportFrame, out: &mut impl Write) -> io::Result<()> {
    write!(out, "Time [hr]")?;
    for col in &frame.columns {
        write!(
            out,
            ",{}",
            csv_field(&format!("{} {} [{}]", col.object, col.name, col.unit))
        )?;
    }
    writeln!(out)?;
    for (time, row) in frame.times.iter().zip(&frame.rows) {
        write!(out, "{time}")?;
        for value in row {
            write!(out, ",{value}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}
