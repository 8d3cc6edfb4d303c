use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use greeter_rpc::logging::init_logging;
use greeter_rpc::{DEFAULT_PORT, Responder, ResponderConfig};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "greeter-server")]
#[command(about = "Serve SayHello greetings over plaintext gRPC")]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "GREETER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Seconds in-flight calls get to finish on shutdown
    #[arg(long, default_value_t = 30)]
    grace_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ResponderConfig::builder()
        .addr(SocketAddr::new(args.host, args.port))
        .grace_period(Duration::from_secs(args.grace_secs))
        .build();

    info!(address = %config.addr, "Starting greeter server");

    Responder::new(config).run_until(shutdown_signal()).await?;

    info!("Server shut down");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
