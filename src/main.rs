use std::env;
use std::io::Write;
use std::process;

use anyhow::{Context, Result};
use ramsim::sim_config::SimConfig;
use ramsim::state::trace_loader::load_trace;
use ramsim::state::{Logger, State};

macro_rules! log {
    ($logger:expr, $($arg:tt)*) => {{
        writeln!($logger, $($arg)*)?;
    }};
}

fn usage() -> ! {
    eprintln!("usage: ramsim <trace-file> [search-term]");
    process::exit(2);
}

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let trace_path = args.next().unwrap_or_else(|| usage());
    let search_term = args.next().unwrap_or_default();

    SimConfig::set_global(SimConfig::from_env()?);
    let config = SimConfig::global();

    let mut logger = Logger::new(&config.log_path)
        .with_context(|| format!("Failed to create log file {}", config.log_path))?
        .with_level(config.log_level_filter()?);
    logger.install().context("A logger was already installed")?;

    log!(logger, "Configuration has been initialized: {:?}", config);

    let ops = load_trace(&trace_path)?;
    log!(logger, "Loaded {} trace operations from {}", ops.len(), trace_path);

    let mut state = State::from_global_config();
    let applied = state.apply_trace(ops).context("Trace replay stopped")?;
    log!(logger, "Applied {} operations.", applied);
    log!(logger, "{}", state);

    let view = state.ram_view(&search_term);
    log!(logger, "{}", view.render(config.address_width));

    logger.flush()?;
    Ok(())
}
