// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup and a seeded in-memory ECS account for integration tests.

use aws_sdk_ecs::types::{ContainerDefinition, KeyValuePair, TaskDefinition};
use ecstools::backend::{Deployment, LoadBalancer, MemoryBackend, RunningTask, Service};
use ecstools::types::TargetGroupArn;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

#[allow(dead_code)]
pub const CLUSTER: &str = "production";
#[allow(dead_code)]
pub const REGISTRY: &str = "123456789012.dkr.ecr.us-east-1.amazonaws.com";

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("ecstools=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn env_var(name: &str, value: &str) -> KeyValuePair {
    KeyValuePair::builder().name(name).value(value).build()
}

#[allow(dead_code)]
pub fn container(name: &str, image: &str) -> ContainerDefinition {
    ContainerDefinition::builder()
        .name(name)
        .image(image)
        .memory(128)
        .essential(true)
        .environment(env_var("TEST", "test"))
        .environment(env_var("ENV", "dev"))
        .environment(env_var("ROLE", "web"))
        .environment(env_var("KEY", "value"))
        .build()
}

/// Revision `revision` of family `family` with the given containers.
#[allow(dead_code)]
pub fn task_definition(
    family: &str,
    revision: i32,
    containers: Vec<ContainerDefinition>,
) -> TaskDefinition {
    TaskDefinition::builder()
        .family(family)
        .revision(revision)
        .task_definition_arn(MemoryBackend::task_definition_arn(family, revision))
        .status(aws_sdk_ecs::types::TaskDefinitionStatus::Active)
        .cpu("256")
        .memory("512")
        .execution_role_arn("arn:aws:iam::123456789012:role/ecsTaskExecutionRole")
        .set_container_definitions(Some(containers))
        .compatibilities(aws_sdk_ecs::types::Compatibility::Fargate)
        .registered_by("arn:aws:iam::123456789012:user/deployer")
        .build()
}

/// A steady service with one PRIMARY deployment of `task_definition`.
#[allow(dead_code)]
pub fn steady_service(name: &str, task_definition: &str, count: i32) -> Service {
    Service {
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        task_definition: task_definition.to_string(),
        desired_count: count,
        running_count: count,
        pending_count: 0,
        launch_type: Some("FARGATE".to_string()),
        deployments: vec![Deployment {
            id: "ecs-svc/1".to_string(),
            status: "PRIMARY".to_string(),
            task_definition: task_definition.to_string(),
            desired_count: count,
            running_count: count,
            pending_count: 0,
            rollout_state: Some("COMPLETED".to_string()),
        }],
        ..Default::default()
    }
}

/// Seed service `name` in `production` running `production-{name}:1`
/// with a single container `{name}:v0.1`; tags v0.1 and v0.2 exist in
/// the registry.
#[allow(dead_code)]
pub fn seed_service(backend: &MemoryBackend, name: &str) {
    let family = format!("{CLUSTER}-{name}");
    let image = format!("{REGISTRY}/{name}:v0.1");
    backend.add_task_definition(task_definition(&family, 1, vec![container(name, &image)]));
    backend.add_service(
        CLUSTER,
        steady_service(name, &MemoryBackend::task_definition_arn(&family, 1), 1),
    );
    backend.add_image(name, "v0.1");
    backend.add_image(name, "v0.2");
}

/// The default fixture: service `app1` in cluster `production`.
#[allow(dead_code)]
pub fn backend() -> MemoryBackend {
    init_tracing();
    let backend = MemoryBackend::new();
    seed_service(&backend, "app1");
    backend
}

#[allow(dead_code)]
pub fn load_balancer(target_group: &str, container: &str, port: i32) -> LoadBalancer {
    LoadBalancer {
        target_group_arn: Some(TargetGroupArn::new(target_group)),
        load_balancer_name: None,
        container_name: Some(container.to_string()),
        container_port: Some(port),
    }
}

/// A RUNNING task of `production` started from `task_definition`.
#[allow(dead_code)]
pub fn running_task(id: &str, task_definition: &str) -> RunningTask {
    RunningTask {
        arn: MemoryBackend::task_arn(CLUSTER, id),
        task_definition: task_definition.to_string(),
        last_status: "RUNNING".to_string(),
        desired_status: "RUNNING".to_string(),
        started_at: chrono::DateTime::from_timestamp(1_700_000_000, 0),
    }
}
