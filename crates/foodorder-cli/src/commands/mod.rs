use crate::backend::Backend;
use crate::error::{is_unavailable, not_found};
use crate::session::SessionCache;
use anyhow::Result;
use foodorder_config::AppConfig;
use foodorder_core::domain::{BatchId, RawOrder};
use foodorder_core::session::{reduce, Action, ViewState};
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;

pub mod batches;
pub mod clear;
pub mod render;
pub mod serve;
pub mod upload;

pub struct Context<'a> {
    pub backend: &'a dyn Backend,
    pub json: bool,
    pub config: &'a AppConfig,
    pub session: &'a SessionCache,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Orders of the newest batch, or of `id`. An unreachable gateway falls back
/// to the cached session when it still holds orders.
pub fn load_view(ctx: &Context<'_>, id: Option<BatchId>, search_term: &str) -> Result<ViewState> {
    let cached = reduce(
        ctx.session.load(),
        Action::SetSearchTerm(search_term.to_string()),
    );

    match fetch_orders(ctx, id) {
        Ok(orders) => {
            let state = reduce(cached, Action::LatestLoaded(orders));
            ctx.session.save(&state);
            Ok(state)
        }
        Err(err) if is_unavailable(&err) && cached.has_orders() => {
            warn!(error = %err, "gateway unreachable, showing cached orders");
            eprintln!("warning: {err}; showing the last cached orders");
            Ok(cached)
        }
        Err(err) => Err(err),
    }
}

fn fetch_orders(ctx: &Context<'_>, id: Option<BatchId>) -> Result<Vec<RawOrder>> {
    match id {
        Some(id) => ctx
            .backend
            .get_batch(id)?
            .map(|batch| batch.survey_data)
            .ok_or_else(|| not_found(format!("batch {id}"))),
        None => ctx
            .backend
            .latest_batch()?
            .map(|batch| batch.survey_data)
            .ok_or_else(|| not_found("no batches stored yet")),
    }
}
