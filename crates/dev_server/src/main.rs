//! Development server for the exam shell bundle.
//!
//! Serves the built page with caching disabled, falls back to the index for
//! client-side routes, and publishes the `shell_init` options at
//! `/shell-options.json` so the page can be pointed at different timeouts or
//! listener policies without a rebuild.

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use clap::{Parser, ValueEnum};
use correlator::ListenerPolicy;
use lockdown::LockdownPolicy;
use shell_wasm::ShellOptions;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const OPTIONS_ROUTE: &str = "/shell-options.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    Route,
    Accumulate,
}

impl From<Policy> for ListenerPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Route => ListenerPolicy::Route,
            Policy::Accumulate => ListenerPolicy::Accumulate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Dev server for the exam shell")]
struct Args {
    /// Directory containing the built shell (Trunk dist output)
    #[arg(long, default_value = "web/dist")]
    dist: PathBuf,

    /// Index file served as fallback for missing routes
    #[arg(long, default_value = "index.html")]
    index: PathBuf,

    /// Address to bind (ip or host)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Reply window for awaitable host calls, in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// How reply listeners attach to the host bridge
    #[arg(long, value_enum, default_value_t = Policy::Route)]
    listener_policy: Policy,

    /// Leave shortcuts, zoom and devtools enabled while debugging
    #[arg(long)]
    no_lockdown: bool,

    /// Console log level inside the page
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn shell_options(args: &Args) -> ShellOptions {
    ShellOptions {
        timeout_ms: args.timeout_ms,
        listener_policy: args.listener_policy.into(),
        lockdown: if args.no_lockdown {
            LockdownPolicy::disabled()
        } else {
            LockdownPolicy::default()
        },
        log_level: args.log_level.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let options = shell_options(&args);
    options
        .level_filter()
        .with_context(|| format!("invalid --log-level {:?}", args.log_level))?;

    let dist_dir = canonicalize_or_create(&args.dist)
        .with_context(|| format!("failed to locate or create {:?}", args.dist))?;

    let index_path = resolve_index(&dist_dir, &args.index);

    let options_json =
        serde_json::to_value(&options).context("failed to encode shell options")?;
    let app = build_app(dist_dir.clone(), index_path.clone(), options_json);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("failed to parse bind address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind listener on {addr}"))?;

    match &index_path {
        Some(index_path) => info!(
            "serving {} with index {:?} on http://{}",
            dist_dir.display(),
            index_path,
            addr
        ),
        None => warn!(
            "serving {} without index fallback ({} missing) on http://{}",
            dist_dir.display(),
            args.index.display(),
            addr
        ),
    }
    info!("shell options at {OPTIONS_ROUTE}: {options:?}");

    let server = axum::serve(listener, app.into_make_service());

    tokio::select! {
        result = server => result.context("server exited with error")?,
        _ = signal::ctrl_c() => {
            warn!("received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    // Ignore error if already set (e.g., during tests).
    let _ = fmt().with_env_filter(env_filter).try_init();
}

fn canonicalize_or_create(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(path.canonicalize()?)
}

fn resolve_index(dist_dir: &Path, index: &Path) -> Option<PathBuf> {
    let index_path = if index.is_absolute() {
        index.to_path_buf()
    } else {
        dist_dir.join(index)
    };

    index_path.exists().then_some(index_path)
}

fn build_app(dist_dir: PathBuf, index_path: Option<PathBuf>, options: serde_json::Value) -> Router {
    let assets = ServeDir::new(dist_dir).append_index_html_on_directories(true);

    let header_layer = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .into_inner();

    let router = Router::new().route(OPTIONS_ROUTE, get(move || async move { Json(options) }));

    let router = match index_path {
        Some(index) => router.fallback_service(assets.fallback(ServeFile::new(index))),
        None => router.fallback_service(assets),
    };

    router.layer(header_layer)
}
