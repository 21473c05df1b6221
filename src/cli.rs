use std::{env, path::PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::types::BlockHeight;

const USAGE: &str = "usage: settlement-engine [--config <path>] [--from <height>] [--to <height>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: PathBuf,
    pub from_height: Option<BlockHeight>,
    pub to_height: Option<BlockHeight>,
}

pub fn cli_options_from_args() -> Result<CliOptions> {
    parse_cli_options(env::args().skip(1))
}

pub fn parse_cli_options<I>(mut args: I) -> Result<CliOptions>
where
    I: Iterator<Item = String>,
{
    let mut config_path = None;
    let mut from_height = None;
    let mut to_height = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--from" => from_height = Some(parse_height(&arg, args.next())?),
            "--to" => to_height = Some(parse_height(&arg, args.next())?),
            other => {
                return Err(anyhow!("unknown argument: {other}. {USAGE}"));
            }
        }
    }

    Ok(CliOptions {
        config_path: config_path.unwrap_or_else(|| PathBuf::from("./settlement.jsonc")),
        from_height,
        to_height,
    })
}

fn parse_height(flag: &str, value: Option<String>) -> Result<BlockHeight> {
    let value = value.ok_or_else(|| anyhow!("missing value for {flag}"))?;
    let height: BlockHeight = value
        .parse()
        .with_context(|| format!("invalid height for {flag}: '{value}'"))?;
    if height < 1 {
        return Err(anyhow!("{flag} must be at least 1, got {height}"));
    }
    Ok(height)
}
