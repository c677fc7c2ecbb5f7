use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{parse_batch_id, pluralize};
use anyhow::Result;
use clap::Args;
use foodorder_core::domain::RawOrder;
use foodorder_core::time::format_order_datetime;

#[derive(Debug, Args)]
pub struct LatestArgs {}

#[derive(Debug, Args)]
pub struct ListArgs {}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

pub fn latest(ctx: &Context<'_>, _args: LatestArgs) -> Result<()> {
    let batch = ctx
        .backend
        .latest_batch()?
        .ok_or_else(|| not_found("no batches stored yet"))?;

    if ctx.json {
        return print_json(&batch);
    }

    print_header(
        "latest batch",
        batch.created_at,
        batch.username.as_deref(),
        batch.survey_data.len(),
    );
    print_orders(&batch.survey_data);
    Ok(())
}

pub fn list(ctx: &Context<'_>, _args: ListArgs) -> Result<()> {
    let batches = ctx.backend.list_batches()?;

    if ctx.json {
        return print_json(&batches);
    }

    if batches.is_empty() {
        println!("no batches");
        return Ok(());
    }

    for batch in batches {
        println!(
            "{}  {}  {}  {}",
            batch.id,
            format_order_datetime(batch.created_at),
            pluralize(batch.survey_data.len(), "order", "orders"),
            batch.username.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

pub fn show(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_batch_id(&args.id)?;
    let batch = ctx
        .backend
        .get_batch(id)?
        .ok_or_else(|| not_found(format!("batch {id}")))?;

    if ctx.json {
        return print_json(&batch);
    }

    print_header(
        &format!("batch {}", batch.id),
        batch.created_at,
        batch.username.as_deref(),
        batch.survey_data.len(),
    );
    print_orders(&batch.survey_data);
    Ok(())
}

fn print_header(label: &str, created_at: i64, username: Option<&str>, rows: usize) {
    let saved = format_order_datetime(created_at);
    match username {
        Some(user) => println!("{label}: saved {saved} by {user}, {}", pluralize(rows, "order", "orders")),
        None => println!("{label}: saved {saved}, {}", pluralize(rows, "order", "orders")),
    }
}

fn print_orders(orders: &[RawOrder]) {
    for order in orders {
        println!(
            "  {}  {}  {}",
            order.timestamp().unwrap_or_default(),
            order.email().unwrap_or("-"),
            order.meal().unwrap_or("-"),
        );
    }
}
