//! Article extractor service entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use article_extractor::api::{create_router, AppState};
use article_extractor::config::Config;
use article_extractor::error::{AppError, Result};
use article_extractor::extractor::ArticleFetcher;
use article_extractor::metrics;
use article_extractor::utils::shutdown_signal;

/// Fetch a page and extract its title, domain and paragraph text.
#[derive(Parser, Debug)]
#[command(name = "article-extractor")]
#[command(about = "HTTP service that extracts a naive article from a URL")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address (overrides BIND_HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Extract a single URL and print the result as JSON.
    Extract {
        /// Page to extract.
        url: String,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load().map_err(AppError::from)?;

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("article_extractor=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    if args.log_json || config.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port, host }) => cmd_serve(config, port.or(args.port), host).await?,
        Some(Command::Extract { url }) => cmd_extract(config, &url).await?,
        Some(Command::CheckConfig) => cmd_check_config(&config)?,
        None => cmd_serve(config, args.port, None).await?,
    }

    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> Result<()> {
    println!("======================================================================");
    println!("ARTICLE EXTRACTOR - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(AppError::InvalidConfig(e));
        }
    }

    let origins = config.origins();
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind: {}:{}", config.host, config.port);
    println!("  Fetch Timeout: {}s", config.fetch_timeout_secs);
    println!("  User-Agent: {}", config.user_agent);
    println!(
        "  CORS: {}",
        match (config.cors_enabled, origins.is_empty()) {
            (false, _) => "Disabled".to_string(),
            (true, true) => "Any origin".to_string(),
            (true, false) => origins.join(", "),
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Extract one URL and print the article as JSON.
async fn cmd_extract(config: Config, url: &str) -> Result<()> {
    config.validate().map_err(AppError::InvalidConfig)?;

    let fetcher = ArticleFetcher::new(&config)?;
    let article = fetcher.extract(url).await?;

    println!("{}", serde_json::to_string_pretty(&article)?);
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    mut config: Config,
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<()> {
    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(host) = host_override {
        config.host = host;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(AppError::InvalidConfig(e));
    }

    info!("Configuration loaded successfully");
    info!("Fetch timeout: {}s", config.fetch_timeout_secs);
    info!(
        "CORS: {}",
        if config.cors_enabled { "enabled" } else { "disabled" }
    );

    let metrics_handle = metrics::init_metrics()?;
    let fetcher = ArticleFetcher::new(&config)?;
    let state = AppState::new(fetcher, Some(metrics_handle));
    let router = create_router(state, &config);

    // Start HTTP server
    let addr = config.bind_addr().map_err(AppError::InvalidConfig)?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
