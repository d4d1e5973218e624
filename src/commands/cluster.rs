// ABOUTME: Cluster command implementations.
// ABOUTME: Lists clusters by name or ARN.

use super::Context;
use super::connection::connect_to_aws;
use ecstools::backend::ServiceOps;
use ecstools::error::Result;
use ecstools::output::Output;
use ecstools::types::arn_resource_name;

pub async fn ls(ctx: &Context, arn: bool) -> Result<()> {
    let backend = connect_to_aws(ctx).await?;
    list_clusters(&backend, &ctx.output, arn).await
}

pub(crate) async fn list_clusters<B: ServiceOps + ?Sized>(
    backend: &B,
    output: &Output,
    arn: bool,
) -> Result<()> {
    let mut clusters = backend.list_clusters().await?;
    if !arn {
        clusters = clusters
            .iter()
            .map(|c| arn_resource_name(c).to_string())
            .collect();
    }
    clusters.sort();
    for cluster in &clusters {
        output.data(cluster, cluster);
    }
    Ok(())
}
