//! cursorstat - Generate comparative HTML adoption reports from Cursor usage exports

use anyhow::Context;
use clap::Parser;
use cursorstat::{
    cli::Cli,
    pipeline::{ReportOptions, generate_report},
    summary::SummaryFormatter,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn run(cli: &Cli) -> anyhow::Result<()> {
    info!("cursorstat v{}", cursorstat::VERSION);

    // The spinner draws on stderr
    let show_progress = is_terminal::is_terminal(std::io::stderr());
    let options = ReportOptions::new(&cli.input, &cli.template, &cli.output)
        .with_periods(cli.periods.to_input())
        .with_dump_json(cli.dump_json.clone())
        .with_progress(show_progress);

    let report = generate_report(&options, chrono::Local::now().date_naive())
        .with_context(|| format!("Failed to generate report from {}", cli.input.display()))?;

    if !cli.no_summary {
        print!("{}", SummaryFormatter::new().format(&report));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Verbosity flags override RUST_LOG
    let filter = match cli.log_directive() {
        Some(directive) => tracing_subscriber::EnvFilter::new(directive),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cursorstat=info")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(&cli) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
