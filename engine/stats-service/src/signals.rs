//! Signal handling for graceful shutdown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let terminate = Arc::new(AtomicBool::new(false));

    #[cfg(unix)]
    {
        if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGTERM, terminate.clone()) {
            error!("Failed to register SIGTERM handler: {}", e);
        }
    }

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let sigterm = async {
        while !terminate.load(Ordering::Relaxed) {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C signal received"),
        _ = sigterm => info!("SIGTERM signal received"),
    }
}
