// ABOUTME: In-memory backend that behaves like a small ECS account.
// ABOUTME: Records every update and registration; used by tests.

use crate::backend::error::{
    BackendError, ClusterNotFoundSnafu, ImageNotFoundSnafu, RejectedSnafu, ServiceNotFoundSnafu,
    TaskDefinitionNotFoundSnafu, TaskNotFoundSnafu,
};
use crate::backend::models::{
    Deployment, RunningTask, Service, ServicePage, TargetHealthState, UpdateServiceRequest,
};
use crate::backend::traits::sealed::Sealed;
use crate::backend::traits::{ImageOps, ServiceOps, TargetHealthOps, TaskDefinitionOps};
use crate::resources::TaskDefinitionCandidate;
use crate::types::{ClusterName, ImageTag, ServiceName, TargetGroupArn};
use async_trait::async_trait;
use aws_sdk_ecs::types::TaskDefinition;
use parking_lot::Mutex;
use snafu::OptionExt;
use std::collections::{BTreeMap, HashMap, HashSet};

const ARN_PREFIX: &str = "arn:aws:ecs:us-east-1:123456789012";
const PAGE_SIZE: usize = 100;

#[derive(Default)]
struct State {
    /// cluster name -> service name -> service
    clusters: BTreeMap<String, BTreeMap<String, Service>>,
    /// family -> revisions, oldest first
    task_definitions: BTreeMap<String, Vec<TaskDefinition>>,
    images: HashSet<(String, String)>,
    /// (cluster, service) -> tasks, in start order
    tasks: BTreeMap<(String, String), Vec<RunningTask>>,
    target_health: HashMap<String, Vec<TargetHealthState>>,
    updates: Vec<UpdateServiceRequest>,
    registrations: Vec<TaskDefinition>,
    describe_calls: HashMap<(String, String), usize>,
    describe_failures: HashMap<(String, String), String>,
}

impl State {
    fn find_task_definition(&self, reference: &str) -> Option<&TaskDefinition> {
        if reference.starts_with("arn:") {
            return self
                .task_definitions
                .values()
                .flatten()
                .find(|td| td.task_definition_arn() == Some(reference));
        }
        match reference.split_once(':') {
            Some((family, revision)) => {
                let revision: i32 = revision.parse().ok()?;
                self.task_definitions
                    .get(family)?
                    .iter()
                    .find(|td| td.revision() == revision)
            }
            None => self.task_definitions.get(reference)?.last(),
        }
    }

    fn service_mut(
        &mut self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<&mut Service, BackendError> {
        self.clusters
            .get_mut(cluster.as_str())
            .context(ClusterNotFoundSnafu {
                cluster: cluster.as_str(),
            })?
            .get_mut(service.as_str())
            .context(ServiceNotFoundSnafu {
                cluster: cluster.as_str(),
                service: service.as_str(),
            })
    }
}

/// Backend holding clusters, services, task definitions, images, and
/// target health in memory.
///
/// Updates converge instantly: a deployment replaces every existing
/// deployment with a single PRIMARY one whose tasks are all running.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster_arn(cluster: &str) -> String {
        format!("{ARN_PREFIX}:cluster/{cluster}")
    }

    pub fn service_arn(cluster: &str, service: &str) -> String {
        format!("{ARN_PREFIX}:service/{cluster}/{service}")
    }

    pub fn task_definition_arn(family: &str, revision: i32) -> String {
        format!("{ARN_PREFIX}:task-definition/{family}:{revision}")
    }

    pub fn task_arn(cluster: &str, id: &str) -> String {
        format!("{ARN_PREFIX}:task/{cluster}/{id}")
    }

    pub fn add_cluster(&self, cluster: &str) {
        self.state
            .lock()
            .clusters
            .entry(cluster.to_string())
            .or_default();
    }

    /// Insert a service into a cluster, creating the cluster if needed.
    pub fn add_service(&self, cluster: &str, mut service: Service) {
        service.cluster_arn = Self::cluster_arn(cluster);
        self.state
            .lock()
            .clusters
            .entry(cluster.to_string())
            .or_default()
            .insert(service.name.clone(), service);
    }

    /// Seed an existing revision; its revision number and ARN are kept.
    pub fn add_task_definition(&self, task_definition: TaskDefinition) {
        let family = task_definition.family().unwrap_or_default().to_string();
        let mut state = self.state.lock();
        let revisions = state.task_definitions.entry(family).or_default();
        revisions.push(task_definition);
        revisions.sort_by_key(|td| td.revision());
    }

    pub fn add_image(&self, repository: &str, tag: &str) {
        self.state
            .lock()
            .images
            .insert((repository.to_string(), tag.to_string()));
    }

    /// Attach a task to a service; its cluster must already exist for
    /// lookups to succeed.
    pub fn add_task(&self, cluster: &str, service: &str, task: RunningTask) {
        self.state
            .lock()
            .tasks
            .entry((cluster.to_string(), service.to_string()))
            .or_default()
            .push(task);
    }

    pub fn set_target_health(&self, target_group: &str, states: Vec<TargetHealthState>) {
        self.state
            .lock()
            .target_health
            .insert(target_group.to_string(), states);
    }

    /// Make every describe of this service fail with `message`.
    pub fn fail_describe(&self, cluster: &str, service: &str, message: &str) {
        self.state.lock().describe_failures.insert(
            (cluster.to_string(), service.to_string()),
            message.to_string(),
        );
    }

    /// Every update-service call, in order.
    pub fn updates(&self) -> Vec<UpdateServiceRequest> {
        self.state.lock().updates.clone()
    }

    /// Every revision registered through the backend, in order.
    pub fn registrations(&self) -> Vec<TaskDefinition> {
        self.state.lock().registrations.clone()
    }

    pub fn describe_calls(&self, cluster: &str, service: &str) -> usize {
        self.state
            .lock()
            .describe_calls
            .get(&(cluster.to_string(), service.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn service(&self, cluster: &str, service: &str) -> Option<Service> {
        self.state
            .lock()
            .clusters
            .get(cluster)
            .and_then(|services| services.get(service))
            .cloned()
    }
}

impl Sealed for MemoryBackend {}

#[async_trait]
impl ServiceOps for MemoryBackend {
    async fn describe_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Service, BackendError> {
        let mut state = self.state.lock();
        let key = (cluster.to_string(), service.to_string());
        *state.describe_calls.entry(key.clone()).or_default() += 1;

        if let Some(message) = state.describe_failures.get(&key) {
            return RejectedSnafu {
                code: Some("ServerException".to_string()),
                message: message.as_str(),
            }
            .fail();
        }
        state.service_mut(cluster, service).map(|s| s.clone())
    }

    async fn update_service(&self, request: &UpdateServiceRequest) -> Result<(), BackendError> {
        let mut state = self.state.lock();

        if let Some(count) = request.desired_count
            && count < 0
        {
            return RejectedSnafu {
                code: Some("InvalidParameterException".to_string()),
                message: "desiredCount can not be less than 0",
            }
            .fail();
        }

        let task_definition_arn = match &request.task_definition {
            Some(reference) => Some(
                state
                    .find_task_definition(reference)
                    .and_then(|td| td.task_definition_arn())
                    .map(str::to_string)
                    .context(TaskDefinitionNotFoundSnafu {
                        reference: reference.as_str(),
                    })?,
            ),
            None => None,
        };

        let service = state.service_mut(&request.cluster, &request.service)?;
        if let Some(count) = request.desired_count {
            service.desired_count = count;
        }
        if let Some(arn) = task_definition_arn {
            service.task_definition = arn;
        }
        if request.task_definition.is_some() || request.force_new_deployment {
            service.deployments = vec![Deployment {
                id: format!("ecs-svc/{}", service.deployments.len() + 1),
                status: "PRIMARY".to_string(),
                task_definition: service.task_definition.clone(),
                desired_count: service.desired_count,
                running_count: service.desired_count,
                pending_count: 0,
                rollout_state: Some("COMPLETED".to_string()),
            }];
        } else if let Some(primary) = service.deployments.iter_mut().find(|d| d.is_primary()) {
            primary.desired_count = service.desired_count;
            primary.running_count = service.desired_count;
        }
        service.running_count = service.desired_count;
        service.pending_count = 0;

        state.updates.push(request.clone());
        Ok(())
    }

    async fn list_services(
        &self,
        cluster: &ClusterName,
        page_token: Option<&str>,
    ) -> Result<ServicePage, BackendError> {
        let state = self.state.lock();
        let services = state
            .clusters
            .get(cluster.as_str())
            .context(ClusterNotFoundSnafu {
                cluster: cluster.as_str(),
            })?;

        let offset = page_token.and_then(|t| t.parse::<usize>().ok()).unwrap_or(0);
        let service_arns: Vec<String> = services
            .keys()
            .skip(offset)
            .take(PAGE_SIZE)
            .map(|name| Self::service_arn(cluster.as_str(), name))
            .collect();
        let next = offset + service_arns.len();
        Ok(ServicePage {
            service_arns,
            next_token: (next < services.len()).then(|| next.to_string()),
        })
    }

    async fn list_clusters(&self) -> Result<Vec<String>, BackendError> {
        Ok(self
            .state
            .lock()
            .clusters
            .keys()
            .map(|name| Self::cluster_arn(name))
            .collect())
    }
    async fn list_running_tasks(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Vec<String>, BackendError> {
        let mut state = self.state.lock();
        state.service_mut(cluster, service)?;
        let key = (cluster.to_string(), service.to_string());
        Ok(state
            .tasks
            .get(&key)
            .map(|tasks| {
                tasks
                    .iter()
                    .filter(|t| t.desired_status == "RUNNING")
                    .map(|t| t.arn.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn describe_task(
        &self,
        cluster: &ClusterName,
        task: &str,
    ) -> Result<RunningTask, BackendError> {
        let state = self.state.lock();
        if !state.clusters.contains_key(cluster.as_str()) {
            return ClusterNotFoundSnafu {
                cluster: cluster.as_str(),
            }
            .fail();
        }
        state
            .tasks
            .iter()
            .filter(|((c, _), _)| c.as_str() == cluster.as_str())
            .flat_map(|(_, tasks)| tasks)
            .find(|t| t.arn == task || t.id() == task)
            .cloned()
            .context(TaskNotFoundSnafu {
                cluster: cluster.as_str(),
                task,
            })
    }
}

#[async_trait]
impl TaskDefinitionOps for MemoryBackend {
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, BackendError> {
        self.state
            .lock()
            .find_task_definition(reference)
            .cloned()
            .context(TaskDefinitionNotFoundSnafu { reference })
    }

    async fn register_task_definition(
        &self,
        candidate: &TaskDefinitionCandidate,
    ) -> Result<TaskDefinition, BackendError> {
        let mut state = self.state.lock();
        let family = candidate.family().to_string();
        let revisions = state.task_definitions.entry(family.clone()).or_default();
        let revision = revisions.last().map(|td| td.revision()).unwrap_or(0) + 1;

        let registered = candidate
            .clone()
            .into_registered(Self::task_definition_arn(&family, revision), revision);
        revisions.push(registered.clone());
        state.registrations.push(registered.clone());
        Ok(registered)
    }

    async fn list_task_definition_families(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.state.lock().task_definitions.keys().cloned().collect())
    }

    async fn list_task_definitions(
        &self,
        family_prefix: &str,
        max_results: i32,
    ) -> Result<Vec<String>, BackendError> {
        let state = self.state.lock();
        let limit = usize::try_from(max_results).unwrap_or(0);
        Ok(state
            .task_definitions
            .get(family_prefix)
            .map(|revisions| {
                revisions
                    .iter()
                    .rev()
                    .take(limit)
                    .filter_map(|td| td.task_definition_arn().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl ImageOps for MemoryBackend {
    async fn verify_image(&self, repository: &str, tag: &ImageTag) -> Result<(), BackendError> {
        let found = self
            .state
            .lock()
            .images
            .contains(&(repository.to_string(), tag.to_string()));
        if found {
            Ok(())
        } else {
            ImageNotFoundSnafu {
                repository,
                tag: tag.as_str(),
            }
            .fail()
        }
    }
}

#[async_trait]
impl TargetHealthOps for MemoryBackend {
    async fn describe_target_health(
        &self,
        target_group: &TargetGroupArn,
    ) -> Result<Vec<TargetHealthState>, BackendError> {
        self.state
            .lock()
            .target_health
            .get(target_group.as_str())
            .cloned()
            .context(RejectedSnafu {
                code: Some("TargetGroupNotFound".to_string()),
                message: format!("Target groups '{target_group}' not found"),
            })
    }
}
