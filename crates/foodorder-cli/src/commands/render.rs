use crate::commands::{load_view, print_json, Context};
use crate::util::{parse_batch_id, pluralize};
use anyhow::Result;
use clap::Args;
use foodorder_core::domain::{normalize_orders, BatchId};
use foodorder_core::mailto::mailto_links;
use foodorder_core::rules::{group_by_restaurant, order_notice, MealTally};
use foodorder_core::time::{format_order_date, format_order_datetime, now_utc};

#[derive(Debug, Args)]
pub struct TallyArgs {
    /// Batch to read instead of the newest one
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Args)]
pub struct WhoArgs {
    /// Case-insensitive part of a name
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Args)]
pub struct MailArgs {
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Args)]
pub struct NoticeArgs {
    #[arg(long)]
    pub id: Option<String>,
}

pub fn tally(ctx: &Context<'_>, args: TallyArgs) -> Result<()> {
    let state = load_view(ctx, batch_id(args.id.as_deref())?, "")?;
    let tally = state.tally();

    if ctx.json {
        return print_json(&tally);
    }

    print_tally(&tally);
    Ok(())
}

pub fn who(ctx: &Context<'_>, args: WhoArgs) -> Result<()> {
    let search = args.search.unwrap_or_default();
    let state = load_view(ctx, batch_id(args.id.as_deref())?, &search)?;
    let roster = state.roster();

    if ctx.json {
        return print_json(&roster);
    }

    if roster.is_empty() {
        if search.trim().is_empty() {
            println!("no orders");
        } else {
            println!("nobody matches {search:?}");
        }
        return Ok(());
    }

    for entry in roster {
        match entry.ordered_at {
            Some(ts) => println!("{}: {} ({})", entry.name, entry.meal, format_order_datetime(ts)),
            None => println!("{}: {}", entry.name, entry.meal),
        }
    }
    Ok(())
}

pub fn mail(ctx: &Context<'_>, args: MailArgs) -> Result<()> {
    let state = load_view(ctx, batch_id(args.id.as_deref())?, "")?;
    let groups = group_by_restaurant(normalize_orders(&state.orders));
    let links = mailto_links(
        &groups,
        &ctx.config.mail.template,
        ctx.config.mail.max_bcc_chars,
    );

    if ctx.json {
        return print_json(&links);
    }

    if links.is_empty() {
        println!("no recipients");
        return Ok(());
    }

    for restaurant in links {
        println!(
            "{} ({})",
            restaurant.display_name,
            pluralize(restaurant.recipients, "recipient", "recipients")
        );
        for link in restaurant.links {
            println!("  {link}");
        }
    }
    Ok(())
}

pub fn notice(ctx: &Context<'_>, args: NoticeArgs) -> Result<()> {
    let state = load_view(ctx, batch_id(args.id.as_deref())?, "")?;
    let stale_after_days = ctx.config.stale_after_days;
    let notice = order_notice(&state.orders, now_utc(), stale_after_days);

    if ctx.json {
        return print_json(&notice);
    }

    let Some(notice) = notice else {
        println!("no orders with a readable timestamp");
        return Ok(());
    };

    println!(
        "order date: {}, {} ordered",
        format_order_date(notice.latest_ordered_at),
        pluralize(notice.total_meals, "meal", "meals")
    );
    if notice.is_stale {
        println!(
            "warning: the newest order is more than {} old, check that this is the current export",
            pluralize(stale_after_days as usize, "day", "days")
        );
    }
    Ok(())
}

pub fn print_tally(tally: &MealTally) {
    if tally.is_empty() {
        println!("no orders");
        return;
    }

    for restaurant in &tally.restaurants {
        println!(
            "{} ({})",
            restaurant.restaurant.display_name(),
            pluralize(restaurant.total(), "meal", "meals")
        );
        for meal in &restaurant.meals {
            println!("  {} x {}", meal.count, meal.meal);
        }
    }
}

fn batch_id(raw: Option<&str>) -> Result<Option<BatchId>> {
    raw.map(parse_batch_id).transpose()
}
