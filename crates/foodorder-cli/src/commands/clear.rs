use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use foodorder_core::session::{reduce, Action};
use tracing::info;

#[derive(Debug, Args)]
pub struct ClearArgs {
    #[arg(long)]
    pub user: Option<String>,
}

/// Batches are append-only, so clearing saves an empty one that becomes the latest.
pub fn clear(ctx: &Context<'_>, args: ClearArgs) -> Result<()> {
    let username = args.user.or_else(|| ctx.config.client.username.clone());
    let id = ctx
        .backend
        .add_batch(&[], username.as_deref())
        .with_context(|| "save empty batch")?;
    ctx.session.save(&reduce(ctx.session.load(), Action::Clear));
    info!(%id, "orders cleared");

    if ctx.json {
        return print_json(&serde_json::json!({ "id": id }));
    }

    println!("orders cleared (batch {id})");
    Ok(())
}
