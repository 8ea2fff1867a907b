//! `roster check` — validate configuration without touching either system.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::RosterConfig;

/// Arguments for `roster check`.
#[derive(Args, Debug)]
pub struct CheckArgs {}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let config = RosterConfig::from_env().context("invalid configuration")?;
        print!("{config}");

        let mut problems = 0;
        for (name, result) in [
            ("Banner", config.banner_client().map(|_| ())),
            ("Knack", config.knack_client().map(|_| ())),
        ] {
            match result {
                Ok(()) => println!("{} {name} ready", "✓".green().bold()),
                Err(err) => {
                    problems += 1;
                    println!("{} {name}: {err}", "✗".red().bold());
                }
            }
        }

        if problems > 0 {
            bail!("configuration incomplete for live runs");
        }
        Ok(())
    }
}
