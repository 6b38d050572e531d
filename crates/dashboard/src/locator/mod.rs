mod k8s_operator;

pub use k8s_operator::{
    map_deployment, DeploymentLister, DiscoveryOutcome, K8sOperatorJobLocator, KubeDeploymentLister,
    NamespaceError,
};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::{config::Config, model::Job, Result};

/// Strategy interface for job discovery. The concrete implementation is
/// chosen once at startup from configuration.
#[async_trait]
pub trait JobLocator: Send + Sync {
    async fn locate_jobs(&self) -> Result<Vec<Job>>;
}

/// Used when discovery is disabled: the dashboard stays up and serves an
/// empty job list.
pub struct NoopJobLocator;

#[async_trait]
impl JobLocator for NoopJobLocator {
    async fn locate_jobs(&self) -> Result<Vec<Job>> {
        Ok(Vec::new())
    }
}

pub async fn create_job_locator(config: &Config) -> Result<Arc<dyn JobLocator>> {
    if !config.joblocator.enabled {
        info!("job discovery is disabled, using noop locator");
        return Ok(Arc::new(NoopJobLocator));
    }

    let namespaces = config.joblocator.namespaces_to_watch();
    info!("watching namespaces: {namespaces:?}");

    let client = kube::Client::try_default().await?;
    Ok(Arc::new(K8sOperatorJobLocator::new(
        KubeDeploymentLister::new(client),
        namespaces,
        config.joblocator.list_timeout(),
    )))
}
