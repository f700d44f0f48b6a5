//! Single-Line Diagram Service (sldsrv)

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::serve;
use clap::Parser;
use tracing::info;
#[cfg(feature = "swagger-ui")]
use utoipa::OpenApi;
#[cfg(feature = "swagger-ui")]
use utoipa_swagger_ui::SwaggerUi;

use common::service_bootstrap::{self, ServiceInfo};
use sldsrv::config::{SldsrvConfig, DEFAULT_PORT, SERVICE_NAME};
#[cfg(feature = "swagger-ui")]
use sldsrv::routes::SldsrvApiDoc;
use sldsrv::{create_app_state, create_routes};

#[derive(Parser, Debug)]
#[command(author, version, about = "Single-line diagram service", long_about = None)]
struct Args {
    /// Configuration file (default: config/sldsrv.yaml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Bind address for API server
    #[arg(short = 'b', long = "bind")]
    bind_address: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Validation mode - only validate configuration without starting service
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    service_bootstrap::load_development_env();

    let config = SldsrvConfig::load(args.config.as_deref())?;

    let service_info = ServiceInfo::new(
        SERVICE_NAME,
        "Single-Line Diagram Service - SVG and metadata per voltage level",
        DEFAULT_PORT,
    );
    service_bootstrap::init_logging(
        &service_info,
        &config.logging,
        args.log_level.as_deref(),
        !args.no_color,
    )?;
    service_bootstrap::print_startup_banner(&service_info);

    config.validate()?;
    if args.validate {
        info!("Validation completed successfully");
        return Ok(());
    }

    let bind_address = config.bind_address(args.bind_address.as_deref());
    let addr: SocketAddr = bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", bind_address))?;

    info!("Starting {} service", config.service.name);
    let state = create_app_state(config).await?;
    let app = create_routes(state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        info!("Swagger UI feature ENABLED - initializing at /docs");
        app.merge(SwaggerUi::new("/docs").url("/openapi.json", SldsrvApiDoc::openapi()))
    };

    #[cfg(not(feature = "swagger-ui"))]
    info!("Swagger UI feature DISABLED");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("API server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    serve(listener, app)
        .with_graceful_shutdown(common::shutdown::wait_for_shutdown())
        .await
        .context("Server error")?;

    info!("{} stopped", SERVICE_NAME);
    Ok(())
}
