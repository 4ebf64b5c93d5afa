//! Service state and HTTP server lifecycle

use anyhow::{Context, Result};
use draft_store::{create_document_store, DocumentStore};
use std::future::Future;
use std::sync::Arc;
use tracing::info;
use warp::Filter;

use crate::config::ServiceConfig;
use crate::rest_api::{create_routes, ApiState};

/// Owns the configuration and the document store handle shared by both pipelines
pub struct StatsService {
    config: ServiceConfig,
    store: Arc<dyn DocumentStore>,
}

impl StatsService {
    /// Build the service, constructing the configured store backend
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let store = create_document_store(&config.store).context("Failed to create document store")?;
        Ok(Self { config, store })
    }

    /// Build the service around an existing store
    pub fn with_store(config: ServiceConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    pub fn routes(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        create_routes(ApiState::new(self.store.clone(), self.config.pipeline.clone()))
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.socket_addr()?;
        let (bound, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("Stats service listening on http://{}", bound);
        server.await;
        info!("Stats service stopped");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draft_store::{InMemoryDocumentStore, StoreConfig};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[test]
    fn test_new_builds_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig { store: StoreConfig::local(dir.path()), ..Default::default() };

        let service = StatsService::new(config).unwrap();
        assert_eq!(service.store.backend_name(), "local");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let mut config = ServiceConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        let service = StatsService::with_store(config, Arc::new(InMemoryDocumentStore::new()));

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(service.run(async {
            let _ = rx.await;
        }));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
        assert!(result.is_ok());
    }
}
