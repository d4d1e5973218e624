// ABOUTME: Deployment planning and sequential group fan-out.
// ABOUTME: Exports the planner, its request/plan/outcome types, and deploy_services.

mod planner;

pub use planner::{DeployOutcome, DeployPlan, DeployRequest, DeploymentPlanner, deploy_services};
