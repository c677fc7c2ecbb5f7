mod backend;
mod commands;
mod error;
mod session;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::backend::{Backend, LocalBackend};
use crate::commands::{batches, clear, render, serve, upload, Context};
use crate::error::{exit_code_for, report_error};
use crate::session::SessionCache;
use foodorder_config as config;
use foodorder_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "foodorder", version, about = "foodorder CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Talk to a running gateway instead of the local database
    #[arg(long, global = true)]
    server: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API on the local database
    Serve(serve::ServeArgs),
    /// Validate a CSV export and save it as a new batch
    Upload(upload::UploadArgs),
    Latest(batches::LatestArgs),
    List(batches::ListArgs),
    Show(batches::ShowArgs),
    /// Meal counts per restaurant
    Tally(render::TallyArgs),
    /// Who ordered what
    Who(render::WhoArgs),
    /// Per-restaurant mailto links announcing the delivery
    Mail(render::MailArgs),
    Notice(render::NoticeArgs),
    /// Submit an empty batch
    Clear(clear::ClearArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        server,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    if verbose {
        debug!(path = %db_path.display(), "database path resolved");
    }

    if let Command::Serve(args) = command {
        let store = open_store(&db_path)?;
        return serve::serve(store, &app_config, args);
    }

    let session = if app_config.session.persist {
        SessionCache::at(paths::session_path_for(&db_path))
    } else {
        SessionCache::disabled()
    };

    let server_url = match server {
        Some(raw) => Some(config::parse_server_url(&raw)?),
        None => app_config.client.server_url.clone(),
    };
    let backend: Box<dyn Backend> = match server_url {
        Some(url) => backend::remote(&url, app_config.client.timeout)?,
        None => Box::new(LocalBackend::new(open_store(&db_path)?)),
    };
    debug!(backend = %backend.describe(), "backend selected");

    let ctx = Context {
        backend: backend.as_ref(),
        json,
        config: &app_config,
        session: &session,
    };

    match command {
        Command::Upload(args) => upload::upload(&ctx, args),
        Command::Latest(args) => batches::latest(&ctx, args),
        Command::List(args) => batches::list(&ctx, args),
        Command::Show(args) => batches::show(&ctx, args),
        Command::Tally(args) => render::tally(&ctx, args),
        Command::Who(args) => render::who(&ctx, args),
        Command::Mail(args) => render::mail(&ctx, args),
        Command::Notice(args) => render::notice(&ctx, args),
        Command::Clear(args) => clear::clear(&ctx, args),
        Command::Serve(_) => unreachable!("serve command handled before backend selection"),
    }
}

fn open_store(db_path: &std::path::Path) -> Result<Store> {
    let store =
        Store::open(db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;
    Ok(store)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
