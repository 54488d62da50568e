/// Entry point and decision loop.
///
/// stdin: one frame per line (see `frame.rs`).
/// stdout: one action token per frame, nothing else.
/// stderr: logs.

use std::io::{self, BufRead, Write};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arena_agent::{Action, Agent, AgentConfig, Frame};

fn main() {
    let (config, problems) = AgentConfig::load();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    AgentConfig::report(&problems);

    info!(
        width = config.grid.width,
        height = config.grid.height,
        seed = ?config.exploration.seed,
        "arena-agent v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(&config) {
        tracing::error!("I/O error: {e}");
        std::process::exit(1);
    }
}

fn run(config: &AgentConfig) -> io::Result<()> {
    let mut agent = Agent::new(config);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let action = match line.parse::<Frame>() {
            Ok(frame) => agent.cycle(frame.status, &frame.tokens),
            Err(err) => {
                warn!(%err, line = %line, "unusable frame");
                Action::NoOp
            }
        };
        writeln!(out, "{action}")?;
        out.flush()?;
    }

    info!(cycles = agent.tick(), "input closed");
    Ok(())
}
