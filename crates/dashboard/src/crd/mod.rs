mod flinkdeployment;

pub use flinkdeployment::{
    FlinkDeployment, FlinkDeploymentSpec, FlinkDeploymentStatus, FlinkJobSpec, FlinkJobStatus,
};
