// ABOUTME: Service command implementations.
// ABOUTME: List, describe, scale, monitor, and edit the environment of services.

use super::Context;
use super::connection::connect_to_aws;
use super::watch::watch;
use crate::cli::Target;
use ecstools::backend::{Backend, ServiceOps};
use ecstools::error::Result;
use ecstools::group::GroupResolver;
use ecstools::monitor::{MonitorExit, TargetGroupHealth};
use ecstools::resources::environment::{apply_pairs, has_changes, parse_pairs};
use ecstools::resources::{EnvChange, ServiceView, TaskDefinitionView};
use ecstools::types::{ClusterName, ServiceName, arn_resource_name};

pub async fn ls(ctx: &Context, cluster: String, arn: bool) -> Result<()> {
    let cluster = ClusterName::new(cluster);
    let backend = connect_to_aws(ctx).await?;

    let mut services = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = backend.list_services(&cluster, token.as_deref()).await?;
        services.extend(page.service_arns);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    if !arn {
        services = services
            .iter()
            .map(|s| arn_resource_name(s).to_string())
            .collect();
        services.sort();
    }
    for service in &services {
        ctx.output.data(service, service);
    }
    Ok(())
}

pub async fn desc(ctx: &Context, cluster: String, service: String) -> Result<()> {
    let cluster = ClusterName::new(cluster);
    let service = ServiceName::new(service);
    let backend = connect_to_aws(ctx).await?;
    let view = ServiceView::load(&backend, &cluster, &service).await?;
    let text = describe_lines(&backend, &view).await?.join("\n");
    ctx.output.data(&text, view.snapshot());
    Ok(())
}

async fn describe_lines<B: Backend + ?Sized>(
    backend: &B,
    view: &ServiceView<'_, B>,
) -> Result<Vec<String>> {
    let snapshot = view.snapshot();
    let mut lines = vec![
        format!(
            "{} {} {} {}",
            view.cluster(),
            view.name(),
            view.task_definition().revision_name(),
            snapshot.launch_type.as_deref().unwrap_or("-")
        ),
        format!(
            "Desired: {} Running: {} Pending: {}",
            snapshot.desired_count, snapshot.running_count, snapshot.pending_count
        ),
    ];

    for info in view.images() {
        lines.push(format!(
            "Container:        {} @ {}",
            info.container,
            info.image.short()
        ));
    }

    for (lb, arn) in snapshot.target_groups() {
        let states = backend.describe_target_health(arn).await?;
        let health = TargetGroupHealth::tally(lb, arn, &states);
        lines.push(format!(
            "Target Group:     {} {} {} {}",
            health.group,
            health.container.as_deref().unwrap_or("-"),
            health
                .port
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            health.summary()
        ));
    }

    if let Some(network) = &snapshot.network {
        lines.push(format!("Subnets:          {}", network.subnets.join(" ")));
        lines.push(format!(
            "Security Groups:  {}",
            network.security_groups.join(" ")
        ));
        lines.push(format!(
            "Public IP:        {}",
            network.assign_public_ip.as_deref().unwrap_or("-")
        ));
    }
    if let Some(created) = snapshot.created_at {
        lines.push(format!(
            "Created:          {}",
            created.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    Ok(lines)
}

/// Set the desired count and follow the rollout to completion.
pub async fn scale(ctx: &mut Context, cluster: String, service: String, count: i32) -> Result<()> {
    let cluster = ClusterName::new(cluster);
    let service = ServiceName::new(service);
    let backend = connect_to_aws(ctx).await?;
    ctx.output.start_timer();

    let view = ServiceView::load(&backend, &cluster, &service).await?;
    view.update_desired_count(count).await?;
    ctx.output.progress(&format!("Scaling {cluster} {service} to {count}"));

    let exit = watch(&backend, ctx, &cluster, vec![service.clone()], true).await?;
    if exit == MonitorExit::Completed {
        ctx.output.success(&format!("Scaled {service} to {count}"));
    }
    Ok(())
}

pub async fn top(ctx: &Context, target: Target, exit_on_complete: bool) -> Result<()> {
    let services = GroupResolver::new(&ctx.config).targets(&target.service, target.group)?;
    let cluster = ClusterName::new(target.cluster);
    let backend = connect_to_aws(ctx).await?;
    watch(&backend, ctx, &cluster, services, exit_on_complete).await?;
    Ok(())
}

/// Options of `service env`.
pub struct EnvArgs {
    pub cluster: String,
    pub service: String,
    pub pairs: Vec<String>,
    pub container: Option<String>,
    pub deploy: bool,
    pub exit_on_complete: bool,
}

/// Print or edit a container's environment.
///
/// Editing registers a new revision; it is deployed only with `--deploy`.
pub async fn env(ctx: &mut Context, args: EnvArgs) -> Result<()> {
    let pairs = parse_pairs(args.pairs.as_slice())?;
    let cluster = ClusterName::new(args.cluster);
    let service = ServiceName::new(args.service);
    let backend = connect_to_aws(ctx).await?;
    ctx.output.start_timer();

    let view = ServiceView::load(&backend, &cluster, &service).await?;
    let task_definition = view.task_definition();
    ctx.output.progress(&format!(
        "Current task definition for {cluster} {service}: {}",
        task_definition.revision_name()
    ));

    let container = task_definition.select_container(args.container.as_deref())?;
    let container_name = container.name().unwrap_or_default().to_string();
    ctx.output.progress(&format!("Container: {container_name}"));

    if pairs.is_empty() {
        for kv in container.environment() {
            let line = format!(
                "{}={}",
                kv.name().unwrap_or_default(),
                kv.value().unwrap_or_default()
            );
            ctx.output.data(&line, &line);
        }
        return Ok(());
    }

    let (environment, changes) = apply_pairs(container.environment(), &pairs);
    for change in &changes {
        for line in diff_lines(change) {
            ctx.output.progress(&line);
        }
    }
    if !has_changes(&changes) {
        ctx.output.success("No changes");
        return Ok(());
    }

    let mut candidate = task_definition.sanitized_copy();
    candidate.set_environment(&container_name, environment);
    let registered = view.register_task_definition(&candidate).await?;
    ctx.output.progress(&format!(
        "Registered new task definition: {}",
        registered.revision_name()
    ));

    if !args.deploy {
        ctx.output.success(&format!(
            "Registered {}; deploy it with --deploy",
            registered.revision_name()
        ));
        return Ok(());
    }

    view.update_task_definition(registered.arn(), true, None).await?;
    ctx.output.progress(&format!(
        "Deploying {} to {cluster} {service}",
        registered.revision_name()
    ));
    watch(&backend, ctx, &cluster, vec![service.clone()], args.exit_on_complete).await?;
    Ok(())
}

fn diff_lines(change: &EnvChange) -> Vec<String> {
    match change {
        EnvChange::Unchanged { key, value } => vec![format!("{key}={value}")],
        EnvChange::Updated { key, old, new } => {
            vec![format!("- {key}={old}"), format!("+ {key}={new}")]
        }
        EnvChange::Added { key, value } => vec![format!("+ {key}={value}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_variable_shows_old_and_new() {
        let change = EnvChange::Updated {
            key: "ENV".to_string(),
            old: "dev".to_string(),
            new: "prod".to_string(),
        };
        assert_eq!(diff_lines(&change), ["- ENV=dev", "+ ENV=prod"]);
    }
}
