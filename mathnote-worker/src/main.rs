mod request;

use clap::Parser;
use env_logger::Env;
use log::{error, info, LevelFilter};
use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

/// Runs mathnote operations over a JSON-lines protocol.
///
/// Each line read from stdin is a request, `{"operation": ..., "args": {...}}`. Each request is
/// answered with exactly one line of JSON on stdout, in order. Logs are written to stderr.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Time limit for a single request, in milliseconds
    #[arg(long, env = "MATHNOTE_TIMEOUT_MS", default_value_t = 1200)]
    timeout_ms: u64,

    /// Requests that ran out of time but are still computing; once this many are alive, new
    /// requests are refused until some finish
    #[arg(long, env = "MATHNOTE_MAX_STALLED", default_value_t = 8)]
    max_stalled: usize,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, env = "MATHNOTE_LOG", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .filter_level(cli.log_level)
        .init();

    let timeout = Duration::from_millis(cli.timeout_ms);
    let runner = request::Runner::new(timeout, cli.max_stalled);
    info!(
        "mathnote-worker v{} ready, time limit {:?}, at most {} stalled requests",
        env!("CARGO_PKG_VERSION"),
        timeout,
        cli.max_stalled,
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = runner.handle_line(&line);
        match serde_json::to_string(&response) {
            Ok(json) => writeln!(stdout, "{}", json)?,
            Err(err) => error!("could not serialize response: {}", err),
        }
        stdout.flush()?;
    }

    info!("stdin closed, exiting");
    Ok(())
}
