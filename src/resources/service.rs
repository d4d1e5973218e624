// ABOUTME: View over one ECS service snapshot plus its current task definition.
// ABOUTME: Read accessors never re-fetch; mutations map to single backend calls.

use crate::backend::{
    Backend, Deployment, LoadBalancer, Service, ServiceEvent, UpdateServiceRequest,
};
use crate::error::Result;
use crate::resources::task_definition::{ImageInfo, TaskDefinitionCandidate, TaskDefinitionView};
use crate::types::{ClusterName, ServiceName};

/// A loaded service and the task definition revision it currently runs.
pub struct ServiceView<'a, B: ?Sized> {
    backend: &'a B,
    cluster: ClusterName,
    name: ServiceName,
    service: Service,
    task_definition: TaskDefinitionView,
}

impl<'a, B: Backend + ?Sized> ServiceView<'a, B> {
    /// Fetch the service and its current task definition.
    pub async fn load(backend: &'a B, cluster: &ClusterName, name: &ServiceName) -> Result<Self> {
        tracing::debug!(%cluster, service = %name, "describing service");
        let service = backend.describe_service(cluster, name).await?;
        let task_definition = TaskDefinitionView::load(backend, &service.task_definition).await?;
        Ok(Self {
            backend,
            cluster: cluster.clone(),
            name: name.clone(),
            service,
            task_definition,
        })
    }

    pub fn cluster(&self) -> &ClusterName {
        &self.cluster
    }

    pub fn name(&self) -> &ServiceName {
        &self.name
    }

    pub fn snapshot(&self) -> &Service {
        &self.service
    }

    pub fn task_definition(&self) -> &TaskDefinitionView {
        &self.task_definition
    }

    pub fn deployments(&self) -> &[Deployment] {
        &self.service.deployments
    }

    pub fn load_balancers(&self) -> &[LoadBalancer] {
        &self.service.load_balancers
    }

    /// The `n` newest events.
    pub fn recent_events(&self, n: usize) -> &[ServiceEvent] {
        let end = n.min(self.service.events.len());
        &self.service.events[..end]
    }

    /// Images of the current task definition, in container order.
    pub fn images(&self) -> Vec<ImageInfo> {
        self.task_definition.images()
    }

    /// Set the desired task count. Not retried on rejection.
    pub async fn update_desired_count(&self, count: i32) -> Result<()> {
        tracing::info!(cluster = %self.cluster, service = %self.name, count, "scaling service");
        let request = UpdateServiceRequest::scale(&self.cluster, &self.name, count);
        self.backend.update_service(&request).await?;
        Ok(())
    }

    /// Point the service at `reference`, optionally forcing new tasks and
    /// overriding the desired count. Not retried on rejection.
    pub async fn update_task_definition(
        &self,
        reference: &str,
        force_new_deployment: bool,
        desired_count: Option<i32>,
    ) -> Result<()> {
        tracing::info!(
            cluster = %self.cluster,
            service = %self.name,
            task_definition = reference,
            force_new_deployment,
            ?desired_count,
            "deploying task definition"
        );
        let request = UpdateServiceRequest::deploy(
            &self.cluster,
            &self.name,
            reference,
            force_new_deployment,
            desired_count,
        );
        self.backend.update_service(&request).await?;
        Ok(())
    }

    /// Register `candidate` as a new revision. The revision exists from
    /// here on whether or not it is ever deployed.
    pub async fn register_task_definition(
        &self,
        candidate: &TaskDefinitionCandidate,
    ) -> Result<TaskDefinitionView> {
        let registered = self.backend.register_task_definition(candidate).await?;
        let view = TaskDefinitionView::new(registered);
        tracing::info!(revision = %view.revision_name(), "registered task definition");
        Ok(view)
    }
}
