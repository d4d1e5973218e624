// ABOUTME: Read-only view over a task definition snapshot.
// ABOUTME: Extracts container image metadata and builds registrable candidates.

use crate::backend::TaskDefinitionOps;
use crate::error::{Error, Result};
use crate::types::ImageRef;
use aws_sdk_ecs::types::{
    Compatibility, ContainerDefinition, EphemeralStorage, InferenceAccelerator, IpcMode,
    KeyValuePair, NetworkMode, PidMode, ProxyConfiguration, RuntimePlatform, TaskDefinition,
    TaskDefinitionPlacementConstraint, Volume,
};
use serde::Serialize;

/// Selects one container of a task definition.
#[derive(Debug, Clone, Copy)]
pub enum ContainerSelector<'a> {
    Name(&'a str),
    Index(usize),
    Container(&'a ContainerDefinition),
}

impl<'a> From<&'a str> for ContainerSelector<'a> {
    fn from(name: &'a str) -> Self {
        ContainerSelector::Name(name)
    }
}

impl From<usize> for ContainerSelector<'_> {
    fn from(index: usize) -> Self {
        ContainerSelector::Index(index)
    }
}

impl<'a> From<&'a ContainerDefinition> for ContainerSelector<'a> {
    fn from(container: &'a ContainerDefinition) -> Self {
        ContainerSelector::Container(container)
    }
}

/// A container's name paired with its parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub container: String,
    pub image: ImageRef,
}

/// Immutable snapshot of one task definition revision.
#[derive(Debug, Clone)]
pub struct TaskDefinitionView {
    inner: TaskDefinition,
}

impl TaskDefinitionView {
    /// Fetch by family, `family:revision`, or ARN.
    pub async fn load<B: TaskDefinitionOps + ?Sized>(backend: &B, reference: &str) -> Result<Self> {
        tracing::debug!(reference, "describing task definition");
        let inner = backend.describe_task_definition(reference).await?;
        Ok(Self { inner })
    }

    pub fn new(inner: TaskDefinition) -> Self {
        Self { inner }
    }

    pub fn arn(&self) -> &str {
        self.inner.task_definition_arn().unwrap_or_default()
    }

    pub fn family(&self) -> &str {
        self.inner.family().unwrap_or_default()
    }

    pub fn revision(&self) -> i32 {
        self.inner.revision()
    }

    /// `family:revision`, the short form shown to operators.
    pub fn revision_name(&self) -> String {
        format!("{}:{}", self.family(), self.revision())
    }

    pub fn cpu(&self) -> Option<&str> {
        self.inner.cpu()
    }

    pub fn memory(&self) -> Option<&str> {
        self.inner.memory()
    }

    /// Containers in definition order.
    pub fn containers(&self) -> &[ContainerDefinition] {
        self.inner.container_definitions()
    }

    pub fn container(&self, name: &str) -> Option<&ContainerDefinition> {
        self.containers().iter().find(|c| c.name() == Some(name))
    }

    /// The named container, or the only one when no name is given.
    ///
    /// Without a name, a task definition with several containers is a
    /// validation error listing their names.
    pub fn select_container(&self, requested: Option<&str>) -> Result<&ContainerDefinition> {
        if let Some(name) = requested {
            return self.container(name).ok_or_else(|| {
                Error::validation(format!(
                    "container {name} not found in {}",
                    self.revision_name()
                ))
            });
        }
        match self.containers() {
            [only] => Ok(only),
            containers => {
                let names: Vec<&str> = containers.iter().filter_map(|c| c.name()).collect();
                Err(Error::validation(format!(
                    "{} has {} containers; choose one with --container: {}",
                    self.revision_name(),
                    containers.len(),
                    names.join(", ")
                )))
            }
        }
    }

    /// Image metadata for the selected container, or `None` if no such
    /// container exists.
    pub fn image_info<'a>(&'a self, selector: impl Into<ContainerSelector<'a>>) -> Option<ImageInfo> {
        let container = match selector.into() {
            ContainerSelector::Name(name) => self.container(name)?,
            ContainerSelector::Index(index) => self.containers().get(index)?,
            ContainerSelector::Container(container) => container,
        };
        Some(ImageInfo {
            container: container.name().unwrap_or_default().to_string(),
            image: ImageRef::parse(container.image().unwrap_or_default()),
        })
    }

    /// Image metadata for every container, in definition order.
    pub fn images(&self) -> Vec<ImageInfo> {
        self.containers()
            .iter()
            .filter_map(|c| self.image_info(c))
            .collect()
    }

    /// Registrable fields only; backend-assigned fields are not carried.
    pub fn sanitized_copy(&self) -> TaskDefinitionCandidate {
        let td = &self.inner;
        TaskDefinitionCandidate {
            family: self.family().to_string(),
            container_definitions: self.containers().to_vec(),
            task_role_arn: td.task_role_arn.clone(),
            execution_role_arn: td.execution_role_arn.clone(),
            network_mode: td.network_mode.clone(),
            volumes: td.volumes.clone(),
            placement_constraints: td.placement_constraints.clone(),
            requires_compatibilities: td.requires_compatibilities.clone(),
            cpu: td.cpu.clone(),
            memory: td.memory.clone(),
            pid_mode: td.pid_mode.clone(),
            ipc_mode: td.ipc_mode.clone(),
            proxy_configuration: td.proxy_configuration.clone(),
            inference_accelerators: td.inference_accelerators.clone(),
            ephemeral_storage: td.ephemeral_storage.clone(),
            runtime_platform: td.runtime_platform.clone(),
        }
    }

    /// Underlying snapshot.
    pub fn snapshot(&self) -> &TaskDefinition {
        &self.inner
    }
}

/// Input to a task definition registration.
///
/// Holds no ARN, revision, status, compatibilities, or required
/// attributes; those are assigned by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDefinitionCandidate {
    pub(crate) family: String,
    pub(crate) container_definitions: Vec<ContainerDefinition>,
    pub(crate) task_role_arn: Option<String>,
    pub(crate) execution_role_arn: Option<String>,
    pub(crate) network_mode: Option<NetworkMode>,
    pub(crate) volumes: Option<Vec<Volume>>,
    pub(crate) placement_constraints: Option<Vec<TaskDefinitionPlacementConstraint>>,
    pub(crate) requires_compatibilities: Option<Vec<Compatibility>>,
    pub(crate) cpu: Option<String>,
    pub(crate) memory: Option<String>,
    pub(crate) pid_mode: Option<PidMode>,
    pub(crate) ipc_mode: Option<IpcMode>,
    pub(crate) proxy_configuration: Option<ProxyConfiguration>,
    pub(crate) inference_accelerators: Option<Vec<InferenceAccelerator>>,
    pub(crate) ephemeral_storage: Option<EphemeralStorage>,
    pub(crate) runtime_platform: Option<RuntimePlatform>,
}

impl TaskDefinitionCandidate {
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn containers(&self) -> &[ContainerDefinition] {
        &self.container_definitions
    }

    /// Replace the image of the container at `index`.
    pub fn set_image(&mut self, index: usize, image: &ImageRef) -> Result<()> {
        let count = self.container_definitions.len();
        let container = self.container_definitions.get_mut(index).ok_or_else(|| {
            Error::validation(format!(
                "tag position {} has no matching container ({} defined)",
                index + 1,
                count
            ))
        })?;
        container.image = Some(image.to_string());
        Ok(())
    }

    /// Replace the environment of the named container. Returns false when
    /// no container has that name.
    pub fn set_environment(&mut self, container: &str, environment: Vec<KeyValuePair>) -> bool {
        match self
            .container_definitions
            .iter_mut()
            .find(|c| c.name() == Some(container))
        {
            Some(definition) => {
                definition.environment = Some(environment);
                true
            }
            None => false,
        }
    }

    /// Assemble a registered snapshot from this candidate plus the
    /// registry-assigned fields.
    pub fn into_registered(self, arn: String, revision: i32) -> TaskDefinition {
        TaskDefinition::builder()
            .task_definition_arn(arn)
            .family(self.family)
            .revision(revision)
            .status(aws_sdk_ecs::types::TaskDefinitionStatus::Active)
            .set_container_definitions(Some(self.container_definitions))
            .set_task_role_arn(self.task_role_arn)
            .set_execution_role_arn(self.execution_role_arn)
            .set_network_mode(self.network_mode)
            .set_volumes(self.volumes)
            .set_placement_constraints(self.placement_constraints)
            .set_requires_compatibilities(self.requires_compatibilities)
            .set_cpu(self.cpu)
            .set_memory(self.memory)
            .set_pid_mode(self.pid_mode)
            .set_ipc_mode(self.ipc_mode)
            .set_proxy_configuration(self.proxy_configuration)
            .set_inference_accelerators(self.inference_accelerators)
            .set_ephemeral_storage(self.ephemeral_storage)
            .set_runtime_platform(self.runtime_platform)
            .build()
    }
}
