// ABOUTME: AWS SDK-backed implementation of the backend capability traits.
// ABOUTME: Wraps the ECS, ECR, and ELBv2 clients and maps their rejections to BackendError.

use crate::backend::error::{
    BackendError, ImageNotFoundSnafu, ServiceNotFoundSnafu, TaskDefinitionNotFoundSnafu,
    TaskNotFoundSnafu,
};
use crate::backend::models::{
    Deployment, LoadBalancer, NetworkSummary, RunningTask, Service, ServiceEvent, ServicePage,
    TargetHealthState, UpdateServiceRequest,
};
use crate::backend::traits::sealed::Sealed;
use crate::backend::traits::{ImageOps, ServiceOps, TargetHealthOps, TaskDefinitionOps};
use crate::error::Error;
use crate::resources::TaskDefinitionCandidate;
use crate::types::{ClusterName, ImageTag, ServiceName, TargetGroupArn};
use async_trait::async_trait;
use aws_sdk_ecr::types::{DescribeImagesFilter, ImageIdentifier, TagStatus};
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ecs::types::{DesiredStatus, SortOrder, TaskDefinition, TaskDefinitionFamilyStatus};
use chrono::{DateTime, Utc};
use snafu::OptionExt;

const LIST_SERVICES_PAGE_SIZE: i32 = 100;

/// Backend talking to the real AWS APIs.
#[derive(Debug, Clone)]
pub struct AwsBackend {
    ecs: aws_sdk_ecs::Client,
    ecr: aws_sdk_ecr::Client,
    elb: aws_sdk_elasticloadbalancingv2::Client,
}

impl AwsBackend {
    /// Load shared AWS configuration and build the three service clients.
    ///
    /// `profile` and `region` override the environment's defaults. Fails
    /// with [`Error::NoRegion`] when no region can be resolved.
    pub async fn connect(profile: Option<&str>, region: Option<&str>) -> Result<Self, Error> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;
        if sdk_config.region().is_none() {
            return Err(Error::NoRegion);
        }

        tracing::debug!(
            region = ?sdk_config.region(),
            profile = profile.unwrap_or("default"),
            "AWS clients configured"
        );

        Ok(Self {
            ecs: aws_sdk_ecs::Client::new(&sdk_config),
            ecr: aws_sdk_ecr::Client::new(&sdk_config),
            elb: aws_sdk_elasticloadbalancingv2::Client::new(&sdk_config),
        })
    }
}

impl Sealed for AwsBackend {}

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// Generic classification: access denials are typed, everything else keeps
/// the backend's own code and message.
fn rejected<E>(err: E) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    if code.as_deref() == Some("AccessDeniedException") {
        return BackendError::AccessDenied { message };
    }
    BackendError::Rejected { code, message }
}

fn map_service_error<E>(err: E, cluster: &ClusterName, service: Option<&ServiceName>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match (err.code(), service) {
        (Some("ClusterNotFoundException"), _) => BackendError::ClusterNotFound {
            cluster: cluster.to_string(),
        },
        (Some("ServiceNotFoundException"), Some(service)) => BackendError::ServiceNotFound {
            cluster: cluster.to_string(),
            service: service.to_string(),
        },
        _ => rejected(err),
    }
}

/// ECS answers an unknown family or revision with a bare `ClientException`.
fn map_task_definition_error<E>(err: E, reference: &str) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match err.code() {
        Some("ClientException") => BackendError::TaskDefinitionNotFound {
            reference: reference.to_string(),
        },
        _ => rejected(err),
    }
}

fn map_image_error<E>(err: E, repository: &str, tag: &ImageTag) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match err.code() {
        Some("ImageNotFoundException") | Some("RepositoryNotFoundException") => {
            BackendError::ImageNotFound {
                repository: repository.to_string(),
                tag: tag.to_string(),
            }
        }
        _ => rejected(err),
    }
}

fn to_utc(ts: &aws_sdk_ecs::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

// =============================================================================
// Conversions
// =============================================================================

fn convert_service(svc: &aws_sdk_ecs::types::Service) -> Service {
    let network = svc
        .network_configuration()
        .and_then(|n| n.awsvpc_configuration())
        .map(|vpc| NetworkSummary {
            subnets: vpc.subnets().to_vec(),
            security_groups: vpc.security_groups().to_vec(),
            assign_public_ip: vpc.assign_public_ip().map(|a| a.as_str().to_string()),
        });

    Service {
        cluster_arn: svc.cluster_arn().unwrap_or_default().to_string(),
        name: svc.service_name().unwrap_or_default().to_string(),
        status: svc.status().unwrap_or_default().to_string(),
        task_definition: svc.task_definition().unwrap_or_default().to_string(),
        desired_count: svc.desired_count(),
        running_count: svc.running_count(),
        pending_count: svc.pending_count(),
        launch_type: svc.launch_type().map(|l| l.as_str().to_string()),
        created_at: svc.created_at().and_then(to_utc),
        deployments: svc.deployments().iter().map(convert_deployment).collect(),
        load_balancers: svc
            .load_balancers()
            .iter()
            .map(|lb| LoadBalancer {
                target_group_arn: lb.target_group_arn().map(TargetGroupArn::new),
                load_balancer_name: lb.load_balancer_name().map(str::to_string),
                container_name: lb.container_name().map(str::to_string),
                container_port: lb.container_port(),
            })
            .collect(),
        events: svc
            .events()
            .iter()
            .map(|e| ServiceEvent {
                id: e.id().unwrap_or_default().to_string(),
                created_at: e.created_at().and_then(to_utc),
                message: e.message().unwrap_or_default().to_string(),
            })
            .collect(),
        network,
    }
}

fn convert_task(task: &aws_sdk_ecs::types::Task) -> RunningTask {
    RunningTask {
        arn: task.task_arn().unwrap_or_default().to_string(),
        task_definition: task.task_definition_arn().unwrap_or_default().to_string(),
        last_status: task.last_status().unwrap_or_default().to_string(),
        desired_status: task.desired_status().unwrap_or_default().to_string(),
        started_at: task.started_at().and_then(to_utc),
    }
}

fn convert_deployment(d: &aws_sdk_ecs::types::Deployment) -> Deployment {
    Deployment {
        id: d.id().unwrap_or_default().to_string(),
        status: d.status().unwrap_or_default().to_string(),
        task_definition: d.task_definition().unwrap_or_default().to_string(),
        desired_count: d.desired_count(),
        running_count: d.running_count(),
        pending_count: d.pending_count(),
        rollout_state: d.rollout_state().map(|s| s.as_str().to_string()),
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

#[async_trait]
impl ServiceOps for AwsBackend {
    async fn describe_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Service, BackendError> {
        let output = self
            .ecs
            .describe_services()
            .cluster(cluster.as_str())
            .services(service.as_str())
            .send()
            .await
            .map_err(|e| map_service_error(e, cluster, Some(service)))?;

        // Missing services come back as failures, not errors.
        let found = output.services().first().context(ServiceNotFoundSnafu {
            cluster: cluster.as_str(),
            service: service.as_str(),
        })?;
        Ok(convert_service(found))
    }

    async fn update_service(&self, request: &UpdateServiceRequest) -> Result<(), BackendError> {
        tracing::debug!(
            cluster = %request.cluster,
            service = %request.service,
            task_definition = ?request.task_definition,
            desired_count = ?request.desired_count,
            "updating service"
        );

        self.ecs
            .update_service()
            .cluster(request.cluster.as_str())
            .service(request.service.as_str())
            .set_task_definition(request.task_definition.clone())
            .set_desired_count(request.desired_count)
            .force_new_deployment(request.force_new_deployment)
            .send()
            .await
            .map_err(|e| map_service_error(e, &request.cluster, Some(&request.service)))?;
        Ok(())
    }

    async fn list_services(
        &self,
        cluster: &ClusterName,
        page_token: Option<&str>,
    ) -> Result<ServicePage, BackendError> {
        let output = self
            .ecs
            .list_services()
            .cluster(cluster.as_str())
            .max_results(LIST_SERVICES_PAGE_SIZE)
            .set_next_token(page_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| map_service_error(e, cluster, None))?;

        Ok(ServicePage {
            service_arns: output.service_arns().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn list_clusters(&self) -> Result<Vec<String>, BackendError> {
        let mut clusters = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .ecs
                .list_clusters()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(rejected)?;
            clusters.extend(output.cluster_arns().iter().cloned());
            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(clusters)
    }

    async fn list_running_tasks(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Vec<String>, BackendError> {
        let mut tasks = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .ecs
                .list_tasks()
                .cluster(cluster.as_str())
                .service_name(service.as_str())
                .desired_status(DesiredStatus::Running)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| map_service_error(e, cluster, Some(service)))?;
            tasks.extend(output.task_arns().iter().cloned());
            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(tasks)
    }

    async fn describe_task(
        &self,
        cluster: &ClusterName,
        task: &str,
    ) -> Result<RunningTask, BackendError> {
        let output = self
            .ecs
            .describe_tasks()
            .cluster(cluster.as_str())
            .tasks(task)
            .send()
            .await
            .map_err(|e| map_service_error(e, cluster, None))?;

        // Unknown tasks come back as failures, not errors.
        let found = output.tasks().first().context(TaskNotFoundSnafu {
            cluster: cluster.as_str(),
            task,
        })?;
        Ok(convert_task(found))
    }
}

#[async_trait]
impl TaskDefinitionOps for AwsBackend {
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, BackendError> {
        let output = self
            .ecs
            .describe_task_definition()
            .task_definition(reference)
            .send()
            .await
            .map_err(|e| map_task_definition_error(e, reference))?;

        output
            .task_definition()
            .cloned()
            .context(TaskDefinitionNotFoundSnafu { reference })
    }

    async fn register_task_definition(
        &self,
        candidate: &TaskDefinitionCandidate,
    ) -> Result<TaskDefinition, BackendError> {
        tracing::debug!(family = %candidate.family, "registering task definition");

        let output = self
            .ecs
            .register_task_definition()
            .family(candidate.family.as_str())
            .set_container_definitions(Some(candidate.container_definitions.clone()))
            .set_task_role_arn(candidate.task_role_arn.clone())
            .set_execution_role_arn(candidate.execution_role_arn.clone())
            .set_network_mode(candidate.network_mode.clone())
            .set_volumes(candidate.volumes.clone())
            .set_placement_constraints(candidate.placement_constraints.clone())
            .set_requires_compatibilities(candidate.requires_compatibilities.clone())
            .set_cpu(candidate.cpu.clone())
            .set_memory(candidate.memory.clone())
            .set_pid_mode(candidate.pid_mode.clone())
            .set_ipc_mode(candidate.ipc_mode.clone())
            .set_proxy_configuration(candidate.proxy_configuration.clone())
            .set_inference_accelerators(candidate.inference_accelerators.clone())
            .set_ephemeral_storage(candidate.ephemeral_storage.clone())
            .set_runtime_platform(candidate.runtime_platform.clone())
            .send()
            .await
            .map_err(rejected)?;

        output
            .task_definition()
            .cloned()
            .context(TaskDefinitionNotFoundSnafu {
                reference: candidate.family.as_str(),
            })
    }

    async fn list_task_definition_families(&self) -> Result<Vec<String>, BackendError> {
        let mut families = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .ecs
                .list_task_definition_families()
                .status(TaskDefinitionFamilyStatus::Active)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(rejected)?;
            families.extend(output.families().iter().cloned());
            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(families)
    }

    async fn list_task_definitions(
        &self,
        family_prefix: &str,
        max_results: i32,
    ) -> Result<Vec<String>, BackendError> {
        let output = self
            .ecs
            .list_task_definitions()
            .family_prefix(family_prefix)
            .sort(SortOrder::Desc)
            .max_results(max_results)
            .send()
            .await
            .map_err(rejected)?;
        Ok(output.task_definition_arns().to_vec())
    }
}

#[async_trait]
impl ImageOps for AwsBackend {
    async fn verify_image(&self, repository: &str, tag: &ImageTag) -> Result<(), BackendError> {
        let output = self
            .ecr
            .describe_images()
            .repository_name(repository)
            .image_ids(ImageIdentifier::builder().image_tag(tag.as_str()).build())
            .filter(
                DescribeImagesFilter::builder()
                    .tag_status(TagStatus::Tagged)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| map_image_error(e, repository, tag))?;

        if output.image_details().is_empty() {
            return ImageNotFoundSnafu {
                repository,
                tag: tag.as_str(),
            }
            .fail();
        }
        Ok(())
    }
}

#[async_trait]
impl TargetHealthOps for AwsBackend {
    async fn describe_target_health(
        &self,
        target_group: &TargetGroupArn,
    ) -> Result<Vec<TargetHealthState>, BackendError> {
        let output = self
            .elb
            .describe_target_health()
            .target_group_arn(target_group.as_str())
            .send()
            .await
            .map_err(rejected)?;

        Ok(output
            .target_health_descriptions()
            .iter()
            .map(|d| {
                d.target_health()
                    .and_then(|h| h.state())
                    .map(|s| TargetHealthState::from_state(s.as_str()))
                    .unwrap_or(TargetHealthState::Unavailable)
            })
            .collect())
    }
}
