// ABOUTME: Decides between a forced redeploy and registering a new revision.
// ABOUTME: Verifies requested image tags, registers candidates, and updates services.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::resources::{ServiceView, TaskDefinitionCandidate};
use crate::types::{ClusterName, ImageRef, ImageTag, ServiceName};
use nonempty::NonEmpty;
use std::collections::HashSet;

/// Tags to deploy, positionally matched to containers, plus an optional
/// desired count override.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub tags: NonEmpty<ImageTag>,
    pub desired_count: Option<i32>,
}

impl DeployRequest {
    /// Build a request from raw tags. An empty list is rejected here,
    /// before any backend call.
    pub fn from_tags<S: AsRef<str>>(tags: &[S], desired_count: Option<i32>) -> Result<Self> {
        let parsed = tags
            .iter()
            .map(|t| ImageTag::new(t.as_ref()).map_err(|e| Error::validation(e.to_string())))
            .collect::<Result<Vec<_>>>()?;
        let tags = NonEmpty::from_vec(parsed)
            .ok_or_else(|| Error::validation("specify one or more tags"))?;
        Ok(Self {
            tags,
            desired_count,
        })
    }
}

/// What a deploy will do to one service.
#[derive(Debug, Clone)]
pub enum DeployPlan {
    /// Every requested tag is already in the current revision; recycle its
    /// tasks.
    Redeploy { task_definition: String },
    /// Register `candidate`, whose images were verified, then deploy it.
    NewRevision {
        candidate: TaskDefinitionCandidate,
        images: Vec<ImageRef>,
    },
}

impl DeployPlan {
    pub fn registers(&self) -> bool {
        matches!(self, DeployPlan::NewRevision { .. })
    }
}

/// Result of deploying one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub service: ServiceName,
    /// `family:revision` the service now points at.
    pub task_definition: String,
    pub previous: String,
    pub registered: bool,
}

pub struct DeploymentPlanner<'a, B: ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> DeploymentPlanner<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Decide how to satisfy `request` for an already loaded service.
    ///
    /// The redeploy path is taken when every requested tag appears among the
    /// current tags (membership, not position). Otherwise tag `i` replaces
    /// the tag of container `i`, each new image is verified, and a candidate
    /// revision is built. Nothing is registered here.
    pub async fn plan(&self, service: &ServiceView<'_, B>, request: &DeployRequest) -> Result<DeployPlan> {
        let task_definition = service.task_definition();
        let current = task_definition.images();
        let current_tags: HashSet<&str> = current.iter().map(|i| i.image.tag()).collect();

        if request.tags.iter().all(|t| current_tags.contains(t.as_str())) {
            tracing::debug!(
                service = %service.name(),
                revision = %task_definition.revision_name(),
                "requested tags already deployed; forcing redeploy"
            );
            return Ok(DeployPlan::Redeploy {
                task_definition: task_definition.arn().to_string(),
            });
        }

        let mut candidate = task_definition.sanitized_copy();
        let mut images = Vec::with_capacity(request.tags.len());
        for (index, tag) in request.tags.iter().enumerate() {
            let info = current.get(index).ok_or_else(|| {
                Error::validation(format!(
                    "{} tags given but {} has {} container(s)",
                    request.tags.len(),
                    task_definition.revision_name(),
                    current.len()
                ))
            })?;
            let image = info.image.with_tag(tag);
            tracing::debug!(container = %info.container, image = %image, "verifying image");
            self.backend.verify_image(image.image(), tag).await?;
            candidate.set_image(index, &image)?;
            images.push(image);
        }

        Ok(DeployPlan::NewRevision { candidate, images })
    }

    /// Carry out `plan`: register if needed, then one forced update.
    pub async fn apply(
        &self,
        service: &ServiceView<'_, B>,
        plan: DeployPlan,
        desired_count: Option<i32>,
    ) -> Result<DeployOutcome> {
        let previous = service.task_definition().revision_name();
        let (reference, task_definition, registered) = match plan {
            DeployPlan::Redeploy { task_definition } => (task_definition, previous.clone(), false),
            DeployPlan::NewRevision { candidate, .. } => {
                let view = service.register_task_definition(&candidate).await?;
                (view.arn().to_string(), view.revision_name(), true)
            }
        };

        service
            .update_task_definition(&reference, true, desired_count)
            .await?;

        Ok(DeployOutcome {
            service: service.name().clone(),
            task_definition,
            previous,
            registered,
        })
    }

    /// Load, plan, and apply for one service.
    pub async fn deploy(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        request: &DeployRequest,
    ) -> Result<DeployOutcome> {
        let view = ServiceView::load(self.backend, cluster, service).await?;
        let plan = self.plan(&view, request).await?;
        self.apply(&view, plan, request.desired_count).await
    }
}

/// Deploy `services` one after another, in order.
///
/// Stops at the first failure. Services deployed before it stay deployed;
/// nothing is rolled back.
pub async fn deploy_services<B, F>(
    planner: &DeploymentPlanner<'_, B>,
    cluster: &ClusterName,
    services: &[ServiceName],
    request: &DeployRequest,
    mut on_deployed: F,
) -> Result<Vec<DeployOutcome>>
where
    B: Backend + ?Sized,
    F: FnMut(&DeployOutcome),
{
    let mut outcomes = Vec::with_capacity(services.len());
    for service in services {
        let outcome = planner.deploy(cluster, service, request).await?;
        on_deployed(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
