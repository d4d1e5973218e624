// ABOUTME: Picks the task and container for an ECS Exec session.
// ABOUTME: Builds the `aws ecs execute-command` arguments for the chosen target.

use crate::backend::{RunningTask, ServiceOps, TaskDefinitionOps};
use crate::error::{Error, Result};
use crate::resources::TaskDefinitionView;
use crate::types::{ClusterName, ServiceName};

/// Command run in the container when none is given.
pub const DEFAULT_COMMAND: &str = "/bin/bash";

/// A running task and one of its containers.
#[derive(Debug, Clone)]
pub struct ExecTarget {
    pub task: RunningTask,
    /// The revision the task was started from, which may lag the service.
    pub task_definition: TaskDefinitionView,
    pub container: String,
}

impl ExecTarget {
    /// Resolve `task` (id or ARN), or the service's first running task when
    /// none is given, then pick `container` from that task's revision.
    pub async fn resolve<B>(
        backend: &B,
        cluster: &ClusterName,
        service: &ServiceName,
        task: Option<&str>,
        container: Option<&str>,
    ) -> Result<Self>
    where
        B: ServiceOps + TaskDefinitionOps + ?Sized,
    {
        let reference = match task {
            Some(task) => task.to_string(),
            None => backend
                .list_running_tasks(cluster, service)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| Error::NoRunningTasks {
                    cluster: cluster.to_string(),
                    service: service.to_string(),
                })?,
        };

        let task = backend.describe_task(cluster, &reference).await?;
        tracing::debug!(
            task = task.id(),
            revision = task.task_definition_revision(),
            "exec task resolved"
        );

        let task_definition = TaskDefinitionView::load(backend, &task.task_definition).await?;
        let container = task_definition
            .select_container(container)?
            .name()
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            task,
            task_definition,
            container,
        })
    }

    /// `<task id> <started at> <family:revision>`
    pub fn summary(&self) -> String {
        let started = self
            .task
            .started_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {}",
            self.task.id(),
            started,
            self.task.task_definition_revision()
        )
    }

    /// Arguments to the `aws` CLI, without profile or region.
    pub fn command_args(&self, cluster: &ClusterName, command: &str) -> Vec<String> {
        [
            "ecs",
            "execute-command",
            "--cluster",
            cluster.as_str(),
            "--task",
            self.task.id(),
            "--container",
            self.container.as_str(),
            "--command",
            command,
            "--interactive",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }
}
