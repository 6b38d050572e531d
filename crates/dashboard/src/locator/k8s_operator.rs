use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::future::join_all;
use kube::{
    api::{Api, ListParams},
    Client,
};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::JobLocator;
use crate::crd::FlinkDeployment;
use crate::metrics;
use crate::model::{Job, JobStatus, JobType};
use crate::{Error, Result};

/// A failed fetch for one namespace. Collected as data during a discovery
/// cycle; never aborts the other namespaces.
#[derive(Debug)]
pub struct NamespaceError {
    pub namespace: String,
    pub cause: String,
}

/// The outcome of one fan-out across all watched namespaces.
pub struct DiscoveryOutcome {
    pub deployments: Vec<FlinkDeployment>,
    pub errors: Vec<NamespaceError>,
}

/// The cluster-side capability the locator depends on: list the operator's
/// deployment resources in one namespace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeploymentLister: Send + Sync {
    async fn list(&self, namespace: &str) -> Result<Vec<FlinkDeployment>>;
}

pub struct KubeDeploymentLister {
    client: Client,
}

impl KubeDeploymentLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeploymentLister for KubeDeploymentLister {
    async fn list(&self, namespace: &str) -> Result<Vec<FlinkDeployment>> {
        let api: Api<FlinkDeployment> = Api::namespaced(self.client.clone(), namespace);
        let deployments = api.list(&ListParams::default()).await?;
        Ok(deployments.items)
    }
}

pub struct K8sOperatorJobLocator<L> {
    lister: L,
    namespaces: Vec<String>,
    list_timeout: Duration,
}

impl<L: DeploymentLister> K8sOperatorJobLocator<L> {
    pub fn new(lister: L, namespaces: Vec<String>, list_timeout: Duration) -> Self {
        Self {
            lister,
            namespaces,
            list_timeout,
        }
    }

    /// Fan out one list call per namespace and wait for all of them.
    /// A timeout or API failure in one namespace leaves a `NamespaceError`
    /// and an empty contribution for this cycle; only when every namespace
    /// fails does the whole cycle fail.
    pub async fn discover(&self) -> Result<DiscoveryOutcome> {
        let fetches = self.namespaces.iter().map(|namespace| async move {
            let outcome = match tokio::time::timeout(
                self.list_timeout,
                self.lister.list(namespace),
            )
            .await
            {
                Ok(Ok(deployments)) => Ok(deployments),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("list timed out after {:?}", self.list_timeout)),
            };
            (namespace.clone(), outcome)
        });

        let mut deployments = Vec::new();
        let mut errors = Vec::new();
        for (namespace, outcome) in join_all(fetches).await {
            match outcome {
                Ok(items) => {
                    debug!("found {} deployment(s) in namespace {namespace}", items.len());
                    deployments.extend(items);
                }
                Err(cause) => {
                    warn!("skipping namespace {namespace} for this cycle: {cause}");
                    metrics::NAMESPACE_ERRORS_TOTAL.inc();
                    errors.push(NamespaceError { namespace, cause });
                }
            }
        }

        if !self.namespaces.is_empty() && errors.len() == self.namespaces.len() {
            error!("all {} watched namespace(s) failed to list", errors.len());
            return Err(Error::Discovery(format!(
                "all {} watched namespace(s) failed to list",
                errors.len()
            )));
        }

        Ok(DiscoveryOutcome {
            deployments,
            errors,
        })
    }
}

#[async_trait]
impl<L: DeploymentLister> JobLocator for K8sOperatorJobLocator<L> {
    async fn locate_jobs(&self) -> Result<Vec<Job>> {
        metrics::DISCOVERY_CYCLES_TOTAL.inc();
        let outcome = self.discover().await?;

        // Guards against a namespace listed twice in the configuration.
        let mut seen = HashSet::new();
        let mut jobs = Vec::new();
        for deployment in &outcome.deployments {
            let job = map_deployment(deployment);
            if seen.insert((job.id.clone(), job.namespace.clone())) {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }
}

/// Pure projection of a deployment resource into the domain job model.
pub fn map_deployment(deployment: &FlinkDeployment) -> Job {
    let name = deployment.metadata.name.clone().unwrap_or_default();
    let namespace = deployment.metadata.namespace.clone().unwrap_or_default();
    let job_status = deployment
        .status
        .as_ref()
        .and_then(|status| status.job_status.as_ref());

    let id = job_status
        .and_then(|js| js.job_id.clone())
        .unwrap_or_else(|| name.clone());
    let status = job_status
        .and_then(|js| js.state.as_deref())
        .map(JobStatus::from_raw)
        .unwrap_or(JobStatus::Unknown);
    let start_time = job_status
        .and_then(|js| js.start_time.as_deref())
        .and_then(parse_epoch_millis);

    let job_spec = deployment.spec.job.as_ref();
    let job_type = if job_spec.is_some() {
        JobType::Application
    } else {
        JobType::Session
    };

    // Labels first, then annotations; an annotation reusing a label key wins.
    let mut metadata = std::collections::BTreeMap::new();
    if let Some(labels) = &deployment.metadata.labels {
        metadata.extend(labels.clone());
    }
    if let Some(annotations) = &deployment.metadata.annotations {
        metadata.extend(annotations.clone());
    }

    Job {
        id,
        name,
        namespace,
        status,
        job_type,
        parallelism: job_spec.and_then(|job| job.parallelism),
        flink_version: deployment.spec.flink_version.clone(),
        image: deployment.spec.image.clone(),
        start_time,
        metadata,
    }
}

fn parse_epoch_millis(raw: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = raw.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
