// ABOUTME: Load balancer target health operations.
// ABOUTME: Reports per-target health states for a target group.

use super::sealed::Sealed;
use crate::backend::BackendError;
use crate::backend::models::TargetHealthState;
use crate::types::TargetGroupArn;
use async_trait::async_trait;

/// Load balancer health operations.
#[async_trait]
pub trait TargetHealthOps: Sealed + Send + Sync {
    /// Health state of every target registered in the group.
    async fn describe_target_health(
        &self,
        target_group: &TargetGroupArn,
    ) -> Result<Vec<TargetHealthState>, BackendError>;
}
