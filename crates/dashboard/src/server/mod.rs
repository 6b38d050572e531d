mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    cache::RefreshCache,
    config::Config,
    locator::JobLocator,
    model::Job,
};

pub struct AppState {
    pub config: Config,
    pub locator: Arc<dyn JobLocator>,
    pub jobs_cache: RefreshCache<Vec<Job>>,
}

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: Config, locator: Arc<dyn JobLocator>) -> Self {
        let jobs_cache = RefreshCache::new(config.joblocator.cache_ttl());
        Self {
            state: Arc::new(AppState {
                config,
                locator,
                jobs_cache,
            }),
        }
    }

    pub fn build_router(self) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/api/jobs", get(routes::list_jobs))
            .route("/api/config", get(routes::get_config))
            .route("/metrics", get(routes::metrics))
            .layer(TraceLayer::new_for_http())
            // The polling UI may be served from a different origin.
            .layer(CorsLayer::permissive())
            .with_state(self.state)
    }

    pub async fn start(self, addr: &str) -> crate::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.build_router()).await?;
        Ok(())
    }
}
