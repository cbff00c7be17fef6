mod assembler;
mod collectors;
mod config;
mod diagnostics;
mod report;

use assembler::assemble;
use clap::Parser;
use collectors::apps::Spotlight;
use collectors::system::LiveHost;
use config::Config;
use diagnostics::TracingSink;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hostreport")]
#[command(version)]
struct Cli {
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    output: Option<String>,
    #[arg(long)]
    log_file: Option<String>,
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_yaml());
        return;
    }

    let mut cfg = match &cli.config {
        Some(path) => match Config::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("hostreport: {err}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(output) = cli.output {
        cfg.report_path = output;
    }
    if let Some(log_file) = cli.log_file {
        cfg.log_path = log_file;
    }
    if let Err(err) = cfg.validate() {
        eprintln!("hostreport: {err}");
        std::process::exit(1);
    }

    if let Err(err) = init_tracing(Path::new(&cfg.log_path)) {
        eprintln!("hostreport: failed to open log file {}: {err}", cfg.log_path);
        std::process::exit(1);
    }

    let mut host = LiveHost::new(&cfg);
    let mut sink = TracingSink::default();
    let report = assemble(&mut host, &Spotlight, &mut sink);

    if let Err(err) = report.write_to_file(&cfg.report_path) {
        error!(error = %err, "failed to generate system report");
        std::process::exit(1);
    }
    info!(
        path = %cfg.report_path,
        sections = ?report.section_names(),
        recovered_failures = sink.error_count(),
        "system report generated successfully"
    );
}

fn init_tracing(log_path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
