// ABOUTME: Collaborator abstraction over the AWS ECS, ECR, and ELBv2 APIs.
// ABOUTME: Traits, crate-owned models, errors, and the AWS and in-memory backends.

mod aws;
mod error;
mod memory;
pub mod models;
pub mod traits;

pub use aws::AwsBackend;
pub use error::{BackendError, BackendErrorKind};
pub use memory::MemoryBackend;
pub use models::{
    Deployment, LoadBalancer, NetworkSummary, RunningTask, Service, ServiceEvent, ServicePage,
    TargetHealthState, UpdateServiceRequest,
};
pub use traits::{Backend, ImageOps, ServiceOps, TargetHealthOps, TaskDefinitionOps};
