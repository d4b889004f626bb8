//! CLI for fetchcheck.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use fetchcheck_core::checksum::ContentDigest;
use fetchcheck_core::config::{self, FetchcheckConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commands::{run_completions, run_fetch, run_reference, run_verify, RunOptions};

/// Top-level CLI for fetchcheck.
#[derive(Debug, Parser)]
#[command(name = "fetchcheck")]
#[command(about = "Verify a forward proxy delivers a resource intact under concurrent load", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/fetchcheck/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute the reference digest, then fetch through the proxy from N concurrent workers and compare.
    Run {
        /// Resource URL (overrides config `target_url`).
        #[arg(long, value_name = "URL")]
        target: Option<String>,
        /// Proxy address, e.g. localhost:8080 or socks5h://host:1080 (overrides config `proxy`).
        #[arg(long, value_name = "ADDR")]
        proxy: Option<String>,
        /// Number of workers (overrides config `workers`).
        #[arg(long, short = 'n', value_name = "N")]
        workers: Option<usize>,
        /// Run at most N workers at once.
        #[arg(long, value_name = "N")]
        max_concurrent: Option<usize>,
        /// Upper bound of each worker's random start delay, in milliseconds.
        #[arg(long, value_name = "MS")]
        jitter_max_ms: Option<u64>,
        /// Total deadline for each fetch, in seconds.
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
        /// Print a JSON report instead of one line per worker.
        #[arg(long)]
        json: bool,
        /// Prefix lines with the worker index and include the failure reason.
        #[arg(long)]
        verbose_outcomes: bool,
    },

    /// Fetch the target directly and print its SHA-256 digest.
    Reference {
        /// Resource URL (overrides config `target_url`).
        #[arg(long, value_name = "URL")]
        target: Option<String>,
        /// Known-good digest; exit non-zero if the target hashes differently.
        #[arg(long, value_name = "DIGEST")]
        expect: Option<ContentDigest>,
    },

    /// Fetch the target once through the proxy and print its SHA-256 digest.
    Fetch {
        /// Resource URL (overrides config `target_url`).
        #[arg(long, value_name = "URL")]
        target: Option<String>,
        /// Proxy address (overrides config `proxy`).
        #[arg(long, value_name = "ADDR")]
        proxy: Option<String>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

fn load_config(path: Option<&Path>) -> Result<FetchcheckConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(ExitCode::SUCCESS);
        }

        let mut cfg = load_config(cli.config.as_deref())?;

        match cli.command {
            CliCommand::Run {
                target,
                proxy,
                workers,
                max_concurrent,
                jitter_max_ms,
                timeout_secs,
                json,
                verbose_outcomes,
            } => {
                apply_target_overrides(&mut cfg, target, proxy);
                if let Some(n) = workers {
                    cfg.workers = n;
                }
                if max_concurrent.is_some() {
                    cfg.max_concurrent = max_concurrent;
                }
                if let Some(ms) = jitter_max_ms {
                    cfg.jitter.max_ms = ms;
                    cfg.jitter.min_ms = cfg.jitter.min_ms.min(ms);
                }
                if let Some(secs) = timeout_secs {
                    cfg.timeouts.total_secs = secs;
                }
                let passed = run_verify(
                    cfg,
                    RunOptions {
                        json,
                        verbose_outcomes,
                    },
                )
                .await?;
                return Ok(exit_code(passed));
            }
            CliCommand::Reference { target, expect } => {
                apply_target_overrides(&mut cfg, target, None);
                let matched = run_reference(cfg, expect).await?;
                return Ok(exit_code(matched));
            }
            CliCommand::Fetch { target, proxy } => {
                apply_target_overrides(&mut cfg, target, proxy);
                run_fetch(cfg).await?;
            }
            CliCommand::Completions { .. } => {}
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn apply_target_overrides(cfg: &mut FetchcheckConfig, target: Option<String>, proxy: Option<String>) {
    if let Some(t) = target {
        cfg.target_url = t;
    }
    if let Some(p) = proxy {
        cfg.proxy = p;
    }
}

#[cfg(test)]
mod tests;
