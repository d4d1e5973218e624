// ABOUTME: Integration tests for deploy planning against the in-memory backend.
// ABOUTME: Covers redeploys, new revisions, image verification, and group deploy ordering.

mod support;

use ecstools::backend::{BackendErrorKind, MemoryBackend, ServiceOps};
use ecstools::deploy::{DeployPlan, DeployRequest, DeploymentPlanner, deploy_services};
use ecstools::error::{Error, ErrorKind};
use ecstools::resources::ServiceView;
use ecstools::types::{ClusterName, ServiceName};
use support::{CLUSTER, REGISTRY, container, seed_service, task_definition};

fn cluster() -> ClusterName {
    ClusterName::new(CLUSTER)
}

fn app1() -> ServiceName {
    ServiceName::new("app1")
}

#[tokio::test]
async fn current_tag_forces_redeploy_without_registration() {
    let backend = support::backend();
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v0.1"], None).unwrap();

    let outcome = planner.deploy(&cluster(), &app1(), &request).await.unwrap();

    assert!(!outcome.registered);
    assert_eq!(outcome.task_definition, "production-app1:1");
    assert_eq!(outcome.previous, "production-app1:1");
    assert!(backend.registrations().is_empty());

    let updates = backend.updates();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].force_new_deployment);
    assert_eq!(
        updates[0].task_definition.as_deref(),
        Some(MemoryBackend::task_definition_arn("production-app1", 1).as_str())
    );
}

#[tokio::test]
async fn new_tag_registers_next_revision() {
    let backend = support::backend();
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v0.2"], None).unwrap();

    let outcome = planner.deploy(&cluster(), &app1(), &request).await.unwrap();

    assert!(outcome.registered);
    assert_eq!(outcome.task_definition, "production-app1:2");
    assert_eq!(outcome.previous, "production-app1:1");

    let registrations = backend.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(
        registrations[0].container_definitions()[0].image(),
        Some(format!("{REGISTRY}/app1:v0.2").as_str())
    );

    let service = backend.service(CLUSTER, "app1").unwrap();
    assert_eq!(service.task_definition_revision(), "production-app1:2");
}

#[tokio::test]
async fn deploy_then_redeploy_previous_tag() {
    let backend = support::backend();
    let planner = DeploymentPlanner::new(&backend);

    let to_v2 = DeployRequest::from_tags(&["v0.2"], None).unwrap();
    planner.deploy(&cluster(), &app1(), &to_v2).await.unwrap();

    // v0.1 is no longer in the current revision, so it registers again.
    let to_v1 = DeployRequest::from_tags(&["v0.1"], None).unwrap();
    let outcome = planner.deploy(&cluster(), &app1(), &to_v1).await.unwrap();
    assert!(outcome.registered);
    assert_eq!(outcome.task_definition, "production-app1:3");
    assert_eq!(backend.registrations().len(), 2);
}

#[tokio::test]
async fn desired_count_travels_with_the_update() {
    let backend = support::backend();
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v0.2"], Some(3)).unwrap();

    planner.deploy(&cluster(), &app1(), &request).await.unwrap();

    assert_eq!(backend.updates()[0].desired_count, Some(3));
    assert_eq!(backend.service(CLUSTER, "app1").unwrap().desired_count, 3);
}

#[tokio::test]
async fn missing_image_stops_before_registration() {
    let backend = support::backend();
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v9.9"], None).unwrap();

    let err = planner
        .deploy(&cluster(), &app1(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ImageNotFound);
    assert_eq!(err.to_string(), "Image not found: app1:v9.9");
    assert!(backend.registrations().is_empty());
    assert!(backend.updates().is_empty());
}

#[tokio::test]
async fn missing_service_is_reported() {
    let backend = support::backend();
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v0.2"], None).unwrap();

    let err = planner
        .deploy(&cluster(), &ServiceName::new("nope"), &request)
        .await
        .unwrap_err();
    match err {
        Error::Backend(source) => assert_eq!(source.kind(), BackendErrorKind::ServiceNotFound),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn tags_map_to_containers_by_position() {
    let backend = MemoryBackend::new();
    backend.add_task_definition(task_definition(
        "production-web",
        5,
        vec![
            container("web", &format!("{REGISTRY}/web:v1")),
            container("worker", &format!("{REGISTRY}/worker:v1")),
        ],
    ));
    backend.add_service(
        CLUSTER,
        support::steady_service(
            "web",
            &MemoryBackend::task_definition_arn("production-web", 5),
            2,
        ),
    );
    backend.add_image("web", "v2");

    let planner = DeploymentPlanner::new(&backend);
    let view = ServiceView::load(&backend, &cluster(), &ServiceName::new("web"))
        .await
        .unwrap();
    let request = DeployRequest::from_tags(&["v2"], None).unwrap();
    let plan = planner.plan(&view, &request).await.unwrap();
    assert!(plan.registers());

    match &plan {
        DeployPlan::NewRevision { candidate, images } => {
            assert_eq!(images.len(), 1);
            assert_eq!(
                candidate.containers()[0].image(),
                Some(format!("{REGISTRY}/web:v2").as_str())
            );
            // Only the first container changes.
            assert_eq!(
                candidate.containers()[1].image(),
                Some(format!("{REGISTRY}/worker:v1").as_str())
            );
        }
        DeployPlan::Redeploy { .. } => panic!("expected a new revision"),
    }

    // Nothing is registered until the plan is applied.
    assert!(backend.registrations().is_empty());
    let outcome = planner.apply(&view, plan, None).await.unwrap();
    assert_eq!(outcome.task_definition, "production-web:6");
}

#[tokio::test]
async fn tag_membership_ignores_position() {
    let backend = MemoryBackend::new();
    backend.add_task_definition(task_definition(
        "production-web",
        1,
        vec![
            container("web", &format!("{REGISTRY}/web:v1")),
            container("worker", &format!("{REGISTRY}/worker:v2")),
        ],
    ));
    backend.add_service(
        CLUSTER,
        support::steady_service(
            "web",
            &MemoryBackend::task_definition_arn("production-web", 1),
            1,
        ),
    );

    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v2"], None).unwrap();
    let outcome = planner
        .deploy(&cluster(), &ServiceName::new("web"), &request)
        .await
        .unwrap();

    assert!(!outcome.registered);
    assert!(backend.updates()[0].force_new_deployment);
}

#[tokio::test]
async fn digest_pinned_image_is_retagged_by_repository() {
    let backend = MemoryBackend::new();
    backend.add_task_definition(task_definition(
        "production-api",
        1,
        vec![container("api", &format!("{REGISTRY}/api@sha256:9b2f4c1e"))],
    ));
    backend.add_service(
        CLUSTER,
        support::steady_service(
            "api",
            &MemoryBackend::task_definition_arn("production-api", 1),
            1,
        ),
    );
    backend.add_image("api", "v3");

    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v3"], None).unwrap();
    let outcome = planner
        .deploy(&cluster(), &ServiceName::new("api"), &request)
        .await
        .unwrap();

    assert!(outcome.registered);
    assert_eq!(
        backend.registrations()[0].container_definitions()[0].image(),
        Some(format!("{REGISTRY}/api:v3").as_str())
    );
}

#[tokio::test]
async fn more_tags_than_containers_is_rejected() {
    let backend = support::backend();
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v0.2", "v0.3"], None).unwrap();

    let err = planner
        .deploy(&cluster(), &app1(), &request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(backend.registrations().is_empty());
}

#[tokio::test]
async fn group_deploy_runs_in_order() {
    let backend = support::backend();
    seed_service(&backend, "app2");
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v0.2"], None).unwrap();
    let services = vec![ServiceName::new("app2"), app1()];

    let mut seen = Vec::new();
    let outcomes = deploy_services(&planner, &cluster(), &services, &request, |o| {
        seen.push(o.service.to_string())
    })
    .await
    .unwrap();

    assert_eq!(seen, ["app2", "app1"]);
    assert_eq!(outcomes.len(), 2);
    let updated: Vec<String> = backend
        .updates()
        .iter()
        .map(|u| u.service.to_string())
        .collect();
    assert_eq!(updated, ["app2", "app1"]);
}

#[tokio::test]
async fn group_deploy_stops_at_first_failure() {
    let backend = support::backend();
    seed_service(&backend, "app3");
    let planner = DeploymentPlanner::new(&backend);
    let request = DeployRequest::from_tags(&["v0.2"], None).unwrap();
    let services = vec![
        app1(),
        ServiceName::new("missing"),
        ServiceName::new("app3"),
    ];

    let err = deploy_services(&planner, &cluster(), &services, &request, |_| {})
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceNotFound);

    // app1 stays deployed; app3 was never attempted.
    let updates = backend.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].service.as_str(), "app1");
    assert_eq!(backend.describe_calls(CLUSTER, "app3"), 0);
    let app3 = backend
        .describe_service(&cluster(), &ServiceName::new("app3"))
        .await
        .unwrap();
    assert_eq!(app3.task_definition_revision(), "production-app3:1");
}
