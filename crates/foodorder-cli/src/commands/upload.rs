use crate::commands::render::print_tally;
use crate::commands::{print_json, Context};
use crate::error::is_unavailable;
use crate::util::{pluralize, remediation_hint};
use anyhow::Result;
use clap::Args;
use foodorder_core::domain::BatchId;
use foodorder_core::dto::ApiErrorDto;
use foodorder_core::rules::{MealTally, ValidationError};
use foodorder_core::session::{reduce, Action, ViewError};
use foodorder_import::read_orders_csv;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct UploadArgs {
    pub file: PathBuf,
    /// Submitter recorded with the batch; defaults to `client.username`
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadReport<'a> {
    id: Option<BatchId>,
    rows: usize,
    skipped_empty: usize,
    tally: &'a MealTally,
}

pub fn upload(ctx: &Context<'_>, args: UploadArgs) -> Result<()> {
    let parsed = read_orders_csv(&args.file)?;
    let skipped_empty = parsed.skipped_empty;
    let username = args.user.or_else(|| ctx.config.client.username.clone());

    let state = reduce(ctx.session.load(), Action::UploadParsed(parsed.orders));
    if let Some(ViewError::Validation(err)) = &state.error {
        ctx.session.save(&state);
        if ctx.json {
            print_json(&ApiErrorDto::from(err))?;
        } else {
            report_violations(err);
        }
        return Err(err.clone().into());
    }

    let state = reduce(state, Action::PersistStarted);
    let rows = state.orders.len();
    let tally = state.tally();

    match ctx.backend.add_batch(&state.orders, username.as_deref()) {
        Ok(id) => {
            ctx.session.save(&reduce(state, Action::PersistSucceeded));
            info!(%id, rows, "batch uploaded");
            if ctx.json {
                return print_json(&UploadReport {
                    id: Some(id),
                    rows,
                    skipped_empty,
                    tally: &tally,
                });
            }
            println!("saved batch {id} ({})", pluralize(rows, "order", "orders"));
            if skipped_empty > 0 {
                println!("skipped {}", pluralize(skipped_empty, "empty row", "empty rows"));
            }
            print_tally(&tally);
            Ok(())
        }
        Err(err) => {
            ctx.session.save(&reduce(state, Action::PersistFailed(err.to_string())));
            if is_unavailable(&err) {
                eprintln!("warning: the batch was not saved; the tally below is local only");
                if ctx.json {
                    print_json(&UploadReport {
                        id: None,
                        rows,
                        skipped_empty,
                        tally: &tally,
                    })?;
                } else {
                    print_tally(&tally);
                }
            }
            Err(err.context("save batch"))
        }
    }
}

fn report_violations(err: &ValidationError) {
    for violation in &err.violations {
        eprintln!("  {violation}");
        eprintln!("    hint: {}", remediation_hint(violation));
    }
}
