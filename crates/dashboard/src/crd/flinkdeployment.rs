use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The Flink Kubernetes Operator's deployment resource, declared with only
/// the fields the dashboard reads. Unknown fields are ignored on
/// deserialization, so this stays compatible as the operator CRD evolves.
#[derive(CustomResource, Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[kube(
    group = "flink.apache.org",
    version = "v1beta1",
    kind = "FlinkDeployment",
    namespaced,
    status = "FlinkDeploymentStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct FlinkDeploymentSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flink_version: Option<String>,

    /// Present only for application-mode deployments; session clusters
    /// have no job section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<FlinkJobSpec>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlinkJobSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_mode: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlinkDeploymentStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_status: Option<FlinkJobStatus>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlinkJobStatus {
    /// Raw lifecycle state string, e.g. "RUNNING". Left untyped here;
    /// translation into the closed domain enum happens in the mapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// Epoch milliseconds as a string, as the operator reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}
