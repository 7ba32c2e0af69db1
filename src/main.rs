use clap::Parser;
use saathi_uploader::app::{self, shutdown_signal};
use saathi_uploader::CliArgs;
use std::process::ExitCode;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let runtime = match app::start(&args) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("   ({})", e);
            return ExitCode::from(1);
        }
    };

    tracing::info!("Starting saathi-uploader {}", env!("CARGO_PKG_VERSION"));
    if args.verbose {
        tracing::debug!("Config: {:?}", runtime.config);
    }

    let router = match runtime.app() {
        Ok(router) => router,
        Err(e) => {
            tracing::error!("❌ Failed to build the upload client: {}", e);
            return ExitCode::from(1);
        }
    };

    let bind = runtime.config.server.bind;
    let listener = match TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("❌ Cannot listen on {}: {}", bind, e);
            eprintln!("❌ Cannot listen on {}: {}", bind, e);
            return ExitCode::from(2);
        }
    };

    tracing::info!("📁 Upload form available at http://{}", bind);
    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("❌ Server error: {}", e);
        return ExitCode::from(1);
    }

    tracing::info!("✅ Uploader stopped");
    ExitCode::SUCCESS
}
