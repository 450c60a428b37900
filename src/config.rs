use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

/// Environment variable consulted when `--seed` is absent
pub const SEED_ENV: &str = "CUP_STACK_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub seed: u32,
    pub pretty: bool,
}

/// Parse command-line arguments (without the program name).
///
/// Seed precedence: `--seed`, then `CUP_STACK_SEED`, then wall-clock seconds.
pub fn parse_args(args: &[String]) -> Result<HostConfig> {
    let mut seed: Option<u32> = None;
    let mut pretty = false;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                seed = Some(parse_seed(v)?);
            }
            "--pretty" => pretty = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    let seed = match seed {
        Some(s) => s,
        None => match std::env::var(SEED_ENV) {
            Ok(v) => parse_seed(&v)?,
            Err(_) => clock_seed(),
        },
    };

    Ok(HostConfig { seed, pretty })
}

fn parse_seed(v: &str) -> Result<u32> {
    v.trim()
        .parse::<u32>()
        .map_err(|_| anyhow!("invalid seed value: {}", v))
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(1)
}
