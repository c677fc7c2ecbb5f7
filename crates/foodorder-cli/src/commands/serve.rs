use anyhow::{Context as _, Result};
use clap::Args;
use foodorder_config::{self as config, AppConfig};
use foodorder_server::AppState;
use foodorder_store::Store;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub bind: Option<String>,
}

pub fn serve(store: Store, app_config: &AppConfig, args: ServeArgs) -> Result<()> {
    let address = match args.bind {
        Some(raw) => config::parse_bind(&raw)?,
        None => app_config.server.bind,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;

    runtime.block_on(async move {
        let listener = foodorder_server::bind(address)
            .await
            .with_context(|| format!("bind {address}"))?;
        eprintln!("listening on http://{}", listener.local_addr()?);
        foodorder_server::serve(listener, AppState::new(store))
            .await
            .with_context(|| "serve http api")
    })
}
