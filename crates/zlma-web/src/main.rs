//! zlma-web binary: serves the zlma pages over CGI or a local HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use zlma_web::handlers::{build_router, Page};
use zlma_web::process::SystemRunner;
use zlma_web::{cgi, AppState, ZlmaConfig};

/// zlma web pages.
#[derive(Parser)]
#[command(name = "zlma-web", about = "zlma inventory and vif control pages")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "ZLMA_WEB_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one page for the CGI request in the environment.
    Cgi {
        /// Page to render: finder, vif-cmd, vif-image-set or vif-hypervisor-disk.
        page: Page,
    },
    /// Serve every page over HTTP.
    Serve {
        /// Bind address (overrides [server] host).
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides [server] port).
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    // stdout carries the page in CGI mode, so logs always go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("zlma_web=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Cgi { page } => {
            let runner = SystemRunner::new(config.process.timeout());
            let status = cgi::run(page, &config, &runner)
                .into_diagnostic()
                .wrap_err("failed to write page to stdout")?;
            if status != 0 {
                std::process::exit(status);
            }
            Ok(())
        }
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .into_diagnostic()?
                .block_on(serve(config))
        }
    }
}

/// Load the config file if one was named, falling back to defaults.
fn load_config(path: Option<&std::path::Path>) -> ZlmaConfig {
    let Some(path) = path else {
        return ZlmaConfig::default();
    };
    ZlmaConfig::from_file(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
        ZlmaConfig::default()
    })
}

async fn serve(config: ZlmaConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let runner = Arc::new(SystemRunner::new(config.process.timeout()));
    let state = Arc::new(AppState::new(config, runner));
    let router = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!(
        bind_addr = %bind_addr,
        zlma = %state.config.tools.zlma,
        vif = %state.config.tools.vif,
        timeout_s = ?state.config.process.timeout_seconds,
        "zlma-web server starting"
    );

    axum::serve(listener, router)
        .await
        .into_diagnostic()
        .wrap_err("server error")
}
