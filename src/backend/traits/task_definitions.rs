// ABOUTME: Task definition registry operations.
// ABOUTME: Describe, register, and list task definition families and revisions.

use super::sealed::Sealed;
use crate::backend::BackendError;
use crate::resources::TaskDefinitionCandidate;
use async_trait::async_trait;
use aws_sdk_ecs::types::TaskDefinition;

/// Task definition registry operations.
#[async_trait]
pub trait TaskDefinitionOps: Sealed + Send + Sync {
    /// Describe a task definition by family, `family:revision`, or ARN.
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, BackendError>;

    /// Register a candidate as a new revision of its family.
    async fn register_task_definition(
        &self,
        candidate: &TaskDefinitionCandidate,
    ) -> Result<TaskDefinition, BackendError>;

    /// All task definition family names.
    async fn list_task_definition_families(&self) -> Result<Vec<String>, BackendError>;

    /// ARNs of the newest `max_results` revisions of a family, newest first.
    async fn list_task_definitions(
        &self,
        family_prefix: &str,
        max_results: i32,
    ) -> Result<Vec<String>, BackendError>;
}
