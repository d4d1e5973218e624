// ABOUTME: Crate-owned snapshots of ECS services and load balancer health.
// ABOUTME: Service, Deployment, LoadBalancer, ServiceEvent, RunningTask, TargetHealthState, update requests.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::types::{ClusterName, ServiceName, TargetGroupArn, arn_resource_name};

/// A service snapshot as returned by one describe call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Service {
    pub cluster_arn: String,
    pub name: String,
    pub status: String,
    /// ARN of the service's current task definition.
    pub task_definition: String,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
    pub launch_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Newest first, as reported by ECS.
    pub deployments: Vec<Deployment>,
    pub load_balancers: Vec<LoadBalancer>,
    /// Bounded recent event log, newest first.
    pub events: Vec<ServiceEvent>,
    pub network: Option<NetworkSummary>,
}

impl Service {
    /// Cluster name taken from the cluster ARN.
    pub fn cluster_name(&self) -> &str {
        arn_resource_name(&self.cluster_arn)
    }

    /// `family:revision` of the current task definition.
    pub fn task_definition_revision(&self) -> &str {
        arn_resource_name(&self.task_definition)
    }

    /// Target groups attached to the service, in attachment order.
    pub fn target_groups(&self) -> impl Iterator<Item = (&LoadBalancer, &TargetGroupArn)> {
        self.load_balancers
            .iter()
            .filter_map(|lb| lb.target_group_arn.as_ref().map(|arn| (lb, arn)))
    }
}

/// One rollout record within a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Deployment {
    pub id: String,
    /// PRIMARY, ACTIVE, or INACTIVE.
    pub status: String,
    pub task_definition: String,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
    pub rollout_state: Option<String>,
}

impl Deployment {
    pub fn is_primary(&self) -> bool {
        self.status == "PRIMARY"
    }

    pub fn task_definition_revision(&self) -> &str {
        arn_resource_name(&self.task_definition)
    }
}

/// A load balancer attachment; classic ELBs carry no target group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadBalancer {
    pub target_group_arn: Option<TargetGroupArn>,
    pub load_balancer_name: Option<String>,
    pub container_name: Option<String>,
    pub container_port: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceEvent {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub message: String,
}

/// One task of a service, as returned by a describe-tasks call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunningTask {
    pub arn: String,
    /// ARN of the revision the task was started from.
    pub task_definition: String,
    pub last_status: String,
    pub desired_status: String,
    pub started_at: Option<DateTime<Utc>>,
}

impl RunningTask {
    /// Task id, the last segment of the task ARN.
    pub fn id(&self) -> &str {
        arn_resource_name(&self.arn)
    }

    pub fn task_definition_revision(&self) -> &str {
        arn_resource_name(&self.task_definition)
    }
}

/// awsvpc network settings of a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: Option<String>,
}

/// Health of one target registered in a target group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetHealthState {
    Initial,
    Healthy,
    Unhealthy,
    Unused,
    Draining,
    Unavailable,
    Other(String),
}

impl TargetHealthState {
    pub fn from_state(state: &str) -> Self {
        match state {
            "initial" => TargetHealthState::Initial,
            "healthy" => TargetHealthState::Healthy,
            "unhealthy" => TargetHealthState::Unhealthy,
            "unused" => TargetHealthState::Unused,
            "draining" => TargetHealthState::Draining,
            "unavailable" => TargetHealthState::Unavailable,
            other => TargetHealthState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TargetHealthState::Initial => "initial",
            TargetHealthState::Healthy => "healthy",
            TargetHealthState::Unhealthy => "unhealthy",
            TargetHealthState::Unused => "unused",
            TargetHealthState::Draining => "draining",
            TargetHealthState::Unavailable => "unavailable",
            TargetHealthState::Other(s) => s,
        }
    }
}

impl fmt::Display for TargetHealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TargetHealthState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Parameters of a single update-service call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateServiceRequest {
    pub cluster: ClusterName,
    pub service: ServiceName,
    pub task_definition: Option<String>,
    pub desired_count: Option<i32>,
    pub force_new_deployment: bool,
}

impl UpdateServiceRequest {
    /// Change only the desired task count.
    pub fn scale(cluster: &ClusterName, service: &ServiceName, count: i32) -> Self {
        Self {
            cluster: cluster.clone(),
            service: service.clone(),
            task_definition: None,
            desired_count: Some(count),
            force_new_deployment: false,
        }
    }

    /// Point the service at a task definition revision.
    pub fn deploy(
        cluster: &ClusterName,
        service: &ServiceName,
        task_definition: &str,
        force_new_deployment: bool,
        desired_count: Option<i32>,
    ) -> Self {
        Self {
            cluster: cluster.clone(),
            service: service.clone(),
            task_definition: Some(task_definition.to_string()),
            desired_count,
            force_new_deployment,
        }
    }
}

/// One page of a service listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePage {
    pub service_arns: Vec<String>,
    pub next_token: Option<String>,
}
