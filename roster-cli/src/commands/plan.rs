//! `roster plan` — fetch both sides and show what a sync would do.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use roster_core::MalformedRecord;
use roster_sync::{
    fetch_and_plan, DuplicateIdentifier, NoOpReason, Operation, OperationKind, Plan, RunSummary,
};

use super::EndpointArgs;
use crate::config::RosterConfig;

/// Arguments for `roster plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Include ids that need no change.
    #[arg(long)]
    pub all: bool,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let config = RosterConfig::from_env().context("invalid configuration")?;
        let mut source = self.endpoints.source(&config)?;
        let mut target = self.endpoints.target(&config)?;

        let plan = fetch_and_plan(
            &mut *source,
            target.as_target(),
            self.endpoints.policy(&config),
        )
        .context("could not build a plan")?;

        if self.json {
            print_json(&plan, self.all)
        } else {
            print_plan(&plan, self.all);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct PlanJson<'a> {
    summary: RunSummary,
    operations: Vec<&'a Operation>,
    malformed: &'a [MalformedRecord],
    duplicates: &'a [DuplicateIdentifier],
}

fn print_json(plan: &Plan, all: bool) -> Result<()> {
    let payload = PlanJson {
        summary: RunSummary::from_plan(plan),
        operations: plan
            .operations
            .iter()
            .filter(|op| all || !op.is_noop())
            .collect(),
        malformed: &plan.malformed,
        duplicates: &plan.duplicates,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize plan JSON")?
    );
    Ok(())
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "employee")]
    employee_id: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_plan(plan: &Plan, all: bool) {
    print_warnings(plan);

    let rows: Vec<PlanRow> = plan
        .operations
        .iter()
        .filter(|op| all || !op.is_noop())
        .map(|op| PlanRow {
            employee_id: op.employee_id().to_string(),
            action: kind_label(op.kind()),
            detail: operation_detail(op),
        })
        .collect();

    if rows.is_empty() {
        println!("✓ nothing to do");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
    println!("{}", RunSummary::from_plan(plan));
}

pub(crate) fn print_warnings(plan: &Plan) {
    for malformed in &plan.malformed {
        println!("{} {malformed}", "!".yellow().bold());
    }
    for duplicate in &plan.duplicates {
        println!("{} {duplicate}", "!".yellow().bold());
    }
}

pub(crate) fn kind_label(kind: OperationKind) -> String {
    let label = kind.to_string().to_uppercase();
    match kind {
        OperationKind::Create => label.green().bold().to_string(),
        OperationKind::Update => label.yellow().bold().to_string(),
        OperationKind::Reactivate => label.cyan().bold().to_string(),
        OperationKind::Deactivate => label.red().bold().to_string(),
        OperationKind::Skip => label.bright_black().to_string(),
    }
}

pub(crate) fn operation_detail(op: &Operation) -> String {
    match op {
        Operation::Create { record } => {
            format!("{} <{}> {}", record.full_name, record.email, record.job_title)
        }
        Operation::Update {
            changes, status, ..
        } => {
            let mut parts: Vec<String> = changes
                .iter()
                .map(|(field, value)| format!("{field} → {value}"))
                .collect();
            if let Some(status) = status {
                parts.push(format!("status → {status}"));
            }
            parts.join(", ")
        }
        Operation::SetInactive { .. } => "status → inactive".to_string(),
        Operation::NoOp { reason, .. } => match reason {
            NoOpReason::Unchanged => "up to date".to_string(),
            NoOpReason::Separated => "separated, left as is".to_string(),
        },
    }
}
