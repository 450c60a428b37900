//! Headless Cup Stack runner (default binary).
//!
//! Reads one JSON request per line on stdin and writes one JSON reply per line on
//! stdout. Logs go to stderr; set `RUST_LOG` to see them.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cup_stack::config::parse_args;
use cup_stack::host::{Host, Reply};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;
    tracing::info!(seed = config.seed, "starting game");

    let (mut host, opening) = Host::new(config.seed).context("starting game")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_reply(&mut out, &opening, config.pretty)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = host.handle_line(line);
        write_reply(&mut out, &reply, config.pretty)?;
    }

    Ok(())
}

fn write_reply(out: &mut impl Write, reply: &Reply, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(reply)?
    } else {
        serde_json::to_string(reply)?
    };
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush().context("writing stdout")?;
    Ok(())
}
