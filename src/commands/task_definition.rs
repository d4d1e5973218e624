// ABOUTME: Task definition command implementations.
// ABOUTME: Lists families, or recent revisions of a family with container details.

use super::Context;
use super::connection::connect_to_aws;
use ecstools::backend::TaskDefinitionOps;
use ecstools::error::Result;
use ecstools::output::Output;
use ecstools::resources::TaskDefinitionView;
use ecstools::types::arn_resource_name;
use serde_json::json;

/// Options of `task-definition ls`.
pub struct LsArgs {
    pub name: Option<String>,
    pub num: i32,
    pub arn: bool,
    pub repo: bool,
    pub no_details: bool,
}

pub async fn ls(ctx: &Context, args: LsArgs) -> Result<()> {
    let backend = connect_to_aws(ctx).await?;
    match args.name.as_deref() {
        None => list_families(&backend, &ctx.output).await,
        Some(name) => list_revisions(&backend, &ctx.output, name, &args).await,
    }
}

async fn list_families<B: TaskDefinitionOps + ?Sized>(backend: &B, output: &Output) -> Result<()> {
    let mut families = backend.list_task_definition_families().await?;
    families.sort();
    for family in &families {
        output.data(family, family);
    }
    Ok(())
}

async fn list_revisions<B: TaskDefinitionOps + ?Sized>(
    backend: &B,
    output: &Output,
    name: &str,
    args: &LsArgs,
) -> Result<()> {
    let mut definitions = if name.contains(':') {
        vec![name.to_string()]
    } else {
        backend.list_task_definitions(name, args.num).await?
    };
    // oldest of the selection first
    definitions.reverse();

    for reference in &definitions {
        let label = if args.arn {
            reference.as_str()
        } else {
            arn_resource_name(reference)
        };
        if args.no_details {
            output.data(label, &label);
            continue;
        }

        let td = TaskDefinitionView::load(backend, reference).await?;
        let mut lines = vec![format!(
            "{} cpu: {} memory: {}",
            label,
            td.cpu().unwrap_or("-"),
            td.memory().unwrap_or("-")
        )];
        let mut containers = Vec::new();
        for c in td.containers() {
            let image = c.image().unwrap_or_default();
            let image = if args.repo {
                image
            } else {
                image.rsplit('/').next().unwrap_or(image)
            };
            let cpu = match c.cpu() {
                0 => "-".to_string(),
                n => n.to_string(),
            };
            let memory = c
                .memory()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string());
            let name = c.name().unwrap_or_default();
            lines.push(format!("  - {name} {cpu} {memory} {image}"));
            containers.push(json!({
                "name": name,
                "cpu": cpu,
                "memory": memory,
                "image": image,
            }));
        }

        let value = json!({
            "task_definition": label,
            "cpu": td.cpu(),
            "memory": td.memory(),
            "containers": containers,
        });
        output.data(&lines.join("\n"), &value);
    }
    Ok(())
}
