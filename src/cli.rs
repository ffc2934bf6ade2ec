use std::fs;

use anyhow::{anyhow, Context, Result};

use crate::core::SimConfig;
use crate::types::GameMode;

/// Default simulated run length
pub const DEFAULT_DURATION_MS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Inline JSON or a path to a JSON file
    pub config: Option<String>,
    pub seed: Option<u32>,
    pub mode: Option<GameMode>,
    pub bot: bool,
    pub duration_ms: u32,
    /// Print the final snapshot as JSON
    pub dump: bool,
    /// Sleep between ticks instead of running flat out
    pub realtime: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: None,
            seed: None,
            mode: None,
            bot: false,
            duration_ms: DEFAULT_DURATION_MS,
            dump: false,
            realtime: false,
        }
    }
}

pub fn parse_run_args(args: &[String]) -> Result<RunArgs> {
    let mut out = RunArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                out.config = Some(v.clone());
            }
            "--seed" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--mode" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --mode"))?;
                out.mode = Some(GameMode::from_str(v).ok_or_else(|| anyhow!("unknown --mode: {}", v))?);
            }
            "--ms" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --ms"))?;
                out.duration_ms = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --ms value: {}", v))?;
            }
            "--bot" => out.bot = true,
            "--dump" => out.dump = true,
            "--realtime" => out.realtime = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

/// Build the configuration: JSON (or defaults), then `ZAPZAP_*`, then flags
pub fn load_config(args: &RunArgs) -> Result<SimConfig> {
    let base = match &args.config {
        None => SimConfig::default(),
        Some(src) => {
            let text = if src.trim_start().starts_with('{') {
                src.clone()
            } else {
                fs::read_to_string(src).with_context(|| format!("reading config {}", src))?
            };
            serde_json::from_str(&text).context("parsing config JSON")?
        }
    };

    let mut config = base.with_env();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if args.bot {
        config.automated_opponent = true;
    }
    Ok(config)
}
