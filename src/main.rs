use std::io::{self, BufRead, BufReader};

use tracing::info;

use slotcheck::config::Config;
use slotcheck::engine::Validator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries results; logs go to stderr.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let config = Config::from_env()?;
    slotcheck::observability::init(config.metrics_port)?;

    let input: Box<dyn BufRead> = match std::env::args().nth(1).as_deref() {
        None | Some("-") => Box::new(BufReader::new(io::stdin())),
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
    };

    info!(
        min_slot_minutes = config.policy.min_slot_minutes,
        max_slot_minutes = config.policy.max_slot_minutes,
        lead_time_hours = config.policy.default_lead_time_hours,
        "slotcheck reading requests"
    );
    let validator = Validator::new(config.policy);
    let summary = slotcheck::cli::run(&validator, config.output, input, io::stdout().lock())?;

    info!("{} requests, {} rejected", summary.total, summary.rejected);
    if summary.exit_code() != 0 {
        std::process::exit(summary.exit_code());
    }
    Ok(())
}
