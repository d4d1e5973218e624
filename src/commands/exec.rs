// ABOUTME: Exec command implementation.
// ABOUTME: Resolves a running task and hands the session to `aws ecs execute-command`.

use super::Context;
use super::connection::{connect_to_aws, session_settings};
use ecstools::error::{Error, Result};
use ecstools::exec::ExecTarget;
use ecstools::types::{ClusterName, ServiceName};
use tokio::process::Command;

/// Options of `service exec`.
pub struct ExecArgs {
    pub cluster: String,
    pub service: String,
    pub command: String,
    pub container: Option<String>,
    pub task: Option<String>,
}

/// Open an interactive session in a running task of the service.
pub async fn exec(ctx: &Context, args: ExecArgs) -> Result<()> {
    let cluster = ClusterName::new(args.cluster);
    let service = ServiceName::new(args.service);
    let backend = connect_to_aws(ctx).await?;

    let target = ExecTarget::resolve(
        &backend,
        &cluster,
        &service,
        args.task.as_deref(),
        args.container.as_deref(),
    )
    .await?;

    ctx.output.progress(&target.summary());
    for info in target.task_definition.images() {
        ctx.output.progress(&format!("\t{}: {}", info.container, info.image));
    }

    let mut command = Command::new("aws");
    command.args(target.command_args(&cluster, &args.command));
    let (profile, region) = session_settings(ctx);
    if let Some(profile) = profile {
        command.args(["--profile", profile]);
    }
    if let Some(region) = region {
        command.args(["--region", region]);
    }

    tracing::debug!(
        task = target.task.id(),
        container = %target.container,
        "starting ECS Exec"
    );
    let status = command
        .status()
        .await
        .map_err(|e| Error::Exec(format!("cannot run the aws CLI: {e}")))?;
    if !status.success() {
        return Err(Error::Exec(format!("aws ecs execute-command {status}")));
    }
    Ok(())
}
