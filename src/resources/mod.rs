// ABOUTME: Views over ECS resources used by the deploy and monitor engines.
// ABOUTME: Task definitions, services, and container environment editing.

pub mod environment;
mod service;
mod task_definition;

pub use environment::EnvChange;
pub use service::ServiceView;
pub use task_definition::{
    ContainerSelector, ImageInfo, TaskDefinitionCandidate, TaskDefinitionView,
};
