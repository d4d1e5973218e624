// ABOUTME: Cluster and service registry operations.
// ABOUTME: Describe, update, and list services; list clusters; find a service's tasks.

use super::sealed::Sealed;
use crate::backend::BackendError;
use crate::backend::models::{RunningTask, Service, ServicePage, UpdateServiceRequest};
use crate::types::{ClusterName, ServiceName};
use async_trait::async_trait;

/// Service registry operations.
#[async_trait]
pub trait ServiceOps: Sealed + Send + Sync {
    /// Fetch a fresh snapshot of one service.
    ///
    /// Fails with `ClusterNotFound` or `ServiceNotFound` when either is absent.
    async fn describe_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Service, BackendError>;

    /// Issue one update-service call. Never retried.
    async fn update_service(&self, request: &UpdateServiceRequest) -> Result<(), BackendError>;

    /// List one page of service ARNs in a cluster.
    async fn list_services(
        &self,
        cluster: &ClusterName,
        page_token: Option<&str>,
    ) -> Result<ServicePage, BackendError>;

    /// List all cluster ARNs.
    async fn list_clusters(&self) -> Result<Vec<String>, BackendError>;

    /// ARNs of the service's tasks whose desired status is RUNNING.
    async fn list_running_tasks(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Vec<String>, BackendError>;

    /// Describe one task by id or ARN. Fails with `TaskNotFound` when the
    /// cluster has no such task.
    async fn describe_task(
        &self,
        cluster: &ClusterName,
        task: &str,
    ) -> Result<RunningTask, BackendError>;
}
