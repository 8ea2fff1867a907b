//! `roster sync` — reconcile and apply.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use roster_sync::{pipeline, ApplyOutcome, RunOptions, RunReport};

use super::plan::{kind_label, print_warnings};
use super::EndpointArgs;
use crate::config::RosterConfig;

/// Arguments for `roster sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    /// Show what would be written without changing any account.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the full run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = RosterConfig::from_env().context("invalid configuration")?;
        let mut source = self.endpoints.source(&config)?;
        let mut target = self.endpoints.target(&config)?;

        let options = RunOptions {
            dry_run: self.dry_run,
            duplicate_policy: self.endpoints.policy(&config),
        };
        let report =
            pipeline::run(&mut *source, target.as_target(), options).context("sync aborted")?;
        target.finish()?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
        } else {
            print_report(&report);
        }

        if report.summary.has_failures() {
            bail!("{} of {} operations failed", report.summary.failed, report.outcomes.len());
        }
        Ok(())
    }
}

fn print_report(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    print_warnings(&report.plan);

    for outcome in &report.outcomes {
        match outcome {
            ApplyOutcome::Applied { employee_id, kind } => {
                println!("  ✎  {} {employee_id}", kind_label(*kind))
            }
            ApplyOutcome::WouldApply { employee_id, kind } => {
                println!("  ~  {} {employee_id}", kind_label(*kind))
            }
            ApplyOutcome::Skipped { .. } => {}
            ApplyOutcome::Failed(failure) => println!("  {}  {failure}", "✗".red().bold()),
        }
    }

    println!("{prefix}✓ {}", report.summary);
}
