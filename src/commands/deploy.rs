// ABOUTME: Deploy command implementation.
// ABOUTME: Validates tags, expands groups, deploys services in order, then monitors the rollout.

use super::Context;
use super::connection::connect_to_aws;
use super::watch::watch;
use crate::cli::Target;
use ecstools::backend::Backend;
use ecstools::deploy::{DeployOutcome, DeployRequest, DeploymentPlanner, deploy_services};
use ecstools::error::Result;
use ecstools::group::GroupResolver;
use ecstools::monitor::MonitorExit;
use ecstools::types::{ClusterName, ServiceName};

/// Deploy `tags` to one service or every service of a group.
pub async fn deploy(
    ctx: &mut Context,
    target: Target,
    tags: Vec<String>,
    count: Option<i32>,
    exit_on_complete: bool,
    detach: bool,
) -> Result<()> {
    // Bad input fails before any AWS call.
    let request = DeployRequest::from_tags(&tags, count)?;
    let services = GroupResolver::new(&ctx.config).targets(&target.service, target.group)?;
    let cluster = ClusterName::new(target.cluster);

    let backend = connect_to_aws(ctx).await?;
    ctx.output.start_timer();

    deploy_with(&backend, ctx, &cluster, &services, &request).await?;

    if !detach {
        let exit = watch(&backend, ctx, &cluster, services.clone(), exit_on_complete).await?;
        if exit == MonitorExit::Cancelled {
            return Ok(());
        }
    }

    ctx.output.success(&format!(
        "Deployed {} service(s) to {cluster}",
        services.len()
    ));
    Ok(())
}

async fn deploy_with<B: Backend + ?Sized>(
    backend: &B,
    ctx: &Context,
    cluster: &ClusterName,
    services: &[ServiceName],
    request: &DeployRequest,
) -> Result<Vec<DeployOutcome>> {
    let planner = DeploymentPlanner::new(backend);
    let output = &ctx.output;
    let mut deployed: Vec<String> = Vec::new();

    let result = deploy_services(&planner, cluster, services, request, |outcome| {
        if outcome.registered {
            output.progress(&format!(
                "Registered new task definition: {}",
                outcome.task_definition
            ));
        } else {
            output.progress(&format!(
                "The images are already in the current task definition. Forcing a new deployment of {}",
                outcome.task_definition
            ));
        }
        output.progress(&format!(
            "Deployed {} to {cluster} {}",
            outcome.task_definition, outcome.service
        ));
        deployed.push(outcome.service.to_string());
    })
    .await;

    if result.is_err() && !deployed.is_empty() {
        output.warning(&format!(
            "already deployed and not rolled back: {}",
            deployed.join(", ")
        ));
    }
    result
}
