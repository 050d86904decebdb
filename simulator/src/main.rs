use anyhow::Context;
use clap::Parser;
use report::summary::SummaryModel;
use std::path::PathBuf;
use workflow::config::SimulationConfig;
use workflow::runner::Runner;

mod plot;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Logistic tumor-growth analysis driver")]
struct Args {
    /// Load a simulation config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output path for the rendered figure
    #[arg(long, default_value = "tumor_growth_panels.png")]
    figure: PathBuf,
    /// Optional path for a JSON run summary
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Initial tumor size P0 (mm^3)
    #[arg(long, default_value_t = 1.0)]
    initial_size: f64,
    /// Growth rate r (1/day)
    #[arg(long, default_value_t = 0.5)]
    growth_rate: f64,
    /// Carrying capacity K (mm^3)
    #[arg(long, default_value_t = 100.0)]
    capacity: f64,
    /// Simulated span in days
    #[arg(long, default_value_t = 20.0)]
    days: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        SimulationConfig::load(path)?
    } else {
        SimulationConfig::from_args(args.initial_size, args.growth_rate, args.capacity, args.days)
    };

    let runner = Runner::new(config.clone());
    let result = runner.execute()?;

    plot::figure::render(&config, &result, &args.figure)
        .with_context(|| format!("rendering figure {}", args.figure.display()))?;
    report::console::print_report(&config, &result);
    println!("\nFigure written to {}", args.figure.display());

    if let Some(path) = args.summary {
        SummaryModel::from_result(&config, &result).write(&path)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
