// ABOUTME: Validated value types shared across the crate.
// ABOUTME: Typed identifiers, image references, requested image tags, and ARN helpers.

mod id;
mod image_ref;
mod image_tag;

pub use id::{ClusterName, Id, ServiceName, TargetGroupArn};
pub use image_ref::ImageRef;
pub use image_tag::{ImageTag, ImageTagError};

/// Last `/`-separated segment of an ARN, e.g. `family:3` for a task
/// definition ARN or the service name for a service ARN.
pub fn arn_resource_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}
