// ABOUTME: Per-service rollout status derived from one poll's snapshots.
// ABOUTME: Target group health tallies, deployment summaries, and the completion rule.

use crate::backend::{LoadBalancer, Service, ServiceEvent, TargetHealthState};
use crate::types::{ServiceName, TargetGroupArn};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RolloutStatus {
    InProgress,
    Completed,
}

impl RolloutStatus {
    /// Completed iff exactly one deployment remains, every desired task is
    /// running, and every attached target group reports only healthy
    /// targets.
    pub fn evaluate(service: &Service, target_groups: &[TargetGroupHealth]) -> Self {
        let settled = service.deployments.len() == 1
            && service.running_count == service.desired_count
            && target_groups.iter().all(TargetGroupHealth::all_healthy);
        if settled {
            RolloutStatus::Completed
        } else {
            RolloutStatus::InProgress
        }
    }
}

impl fmt::Display for RolloutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RolloutStatus::InProgress => f.write_str("In Progress"),
            RolloutStatus::Completed => f.write_str("Completed"),
        }
    }
}

/// Health tally for one target group, states in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetGroupHealth {
    pub group: String,
    pub container: Option<String>,
    pub port: Option<i32>,
    pub counts: Vec<(TargetHealthState, usize)>,
}

impl TargetGroupHealth {
    pub fn tally(lb: &LoadBalancer, arn: &TargetGroupArn, states: &[TargetHealthState]) -> Self {
        let mut counts: Vec<(TargetHealthState, usize)> = Vec::new();
        for state in states {
            match counts.iter_mut().find(|(s, _)| s == state) {
                Some((_, n)) => *n += 1,
                None => counts.push((state.clone(), 1)),
            }
        }
        Self {
            group: arn.group_name().to_string(),
            container: lb.container_name.clone(),
            port: lb.container_port,
            counts,
        }
    }

    pub fn all_healthy(&self) -> bool {
        self.counts
            .iter()
            .all(|(state, _)| *state == TargetHealthState::Healthy)
    }

    /// `healthy: 2 draining: 1`
    pub fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(state, n)| format!("{state}: {n}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One deployment line of the live view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentSummary {
    pub status: String,
    pub revision: String,
    pub desired: i32,
    pub running: i32,
    pub pending: i32,
    /// `image:tag` of each container in the deployment's revision.
    pub images: Vec<String>,
}

/// Everything shown for one service on one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRollout {
    pub cluster: String,
    pub service: String,
    pub desired: i32,
    pub running: i32,
    pub pending: i32,
    pub deployments: Vec<DeploymentSummary>,
    pub target_groups: Vec<TargetGroupHealth>,
    pub events: Vec<ServiceEvent>,
    pub status: RolloutStatus,
}

/// Outcome of polling one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ServiceReport {
    Rollout(ServiceRollout),
    /// The fetch failed; the message is shown in place of the service.
    Unavailable { service: ServiceName, error: String },
}

impl ServiceReport {
    /// A service whose fetch failed never counts as completed.
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            ServiceReport::Rollout(ServiceRollout {
                status: RolloutStatus::Completed,
                ..
            })
        )
    }
}
