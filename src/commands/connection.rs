// ABOUTME: Shared helper for connecting to AWS.
// ABOUTME: Resolves profile and region from flags then config, and builds the backend.

use super::Context;
use ecstools::backend::AwsBackend;
use ecstools::error::Result;

/// Connect to AWS using flag values first, then config file defaults.
///
/// Called only after a command has validated its arguments, so bad input
/// never waits on credential resolution.
pub async fn connect_to_aws(ctx: &Context) -> Result<AwsBackend> {
    let (profile, region) = session_settings(ctx);
    tracing::debug!(?profile, ?region, "connecting to AWS");
    AwsBackend::connect(profile, region).await
}

/// Profile and region in effect: flags first, then the config file.
pub fn session_settings(ctx: &Context) -> (Option<&str>, Option<&str>) {
    (
        ctx.profile.as_deref().or(ctx.config.profile.as_deref()),
        ctx.region.as_deref().or(ctx.config.region.as_deref()),
    )
}
