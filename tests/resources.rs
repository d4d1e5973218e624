// ABOUTME: Integration tests for service and task definition views.
// ABOUTME: Checks sanitized copies, registration, environment edits, and service updates.

mod support;

use ecstools::backend::{MemoryBackend, ServiceOps, TaskDefinitionOps};
use ecstools::error::ErrorKind;
use ecstools::resources::environment::{apply_pairs, has_changes, parse_pairs};
use ecstools::resources::{EnvChange, ServiceView, TaskDefinitionView};
use ecstools::types::{ClusterName, ImageRef, ServiceName};
use support::{CLUSTER, REGISTRY};

async fn app1_view(backend: &MemoryBackend) -> ServiceView<'_, MemoryBackend> {
    ServiceView::load(backend, &ClusterName::new(CLUSTER), &ServiceName::new("app1"))
        .await
        .unwrap()
}

mod task_definitions {
    use super::*;

    #[tokio::test]
    async fn sanitized_copy_keeps_registrable_fields() {
        let backend = support::backend();
        let td = TaskDefinitionView::load(&backend, "production-app1").await.unwrap();
        let candidate = td.sanitized_copy();

        assert_eq!(candidate.family(), "production-app1");
        assert_eq!(candidate.containers(), td.containers());
    }

    #[tokio::test]
    async fn registering_a_copy_assigns_only_registry_fields() {
        let backend = support::backend();
        let td = TaskDefinitionView::load(&backend, "production-app1:1").await.unwrap();

        let registered = backend
            .register_task_definition(&td.sanitized_copy())
            .await
            .unwrap();
        let registered = TaskDefinitionView::new(registered);

        assert_eq!(registered.revision(), 2);
        assert_eq!(
            registered.arn(),
            MemoryBackend::task_definition_arn("production-app1", 2)
        );
        assert_eq!(registered.containers(), td.containers());
        assert_eq!(registered.cpu(), Some("256"));
        assert_eq!(registered.memory(), Some("512"));
        assert_eq!(
            registered.snapshot().execution_role_arn(),
            td.snapshot().execution_role_arn()
        );
        // Output-only fields of the source are not carried over.
        assert!(registered.snapshot().compatibilities().is_empty());
        assert!(registered.snapshot().registered_by().is_none());
    }

    #[tokio::test]
    async fn images_follow_container_order() {
        let backend = support::backend();
        let td = TaskDefinitionView::load(&backend, "production-app1").await.unwrap();
        let images = td.images();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].container, "app1");
        assert_eq!(images[0].image, ImageRef::parse(&format!("{REGISTRY}/app1:v0.1")));
    }

    #[tokio::test]
    async fn unknown_reference_is_not_found() {
        let backend = support::backend();
        let err = TaskDefinitionView::load(&backend, "production-app1:9")
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::TaskDefinitionNotFound);
    }
}

mod services {
    use super::*;

    #[tokio::test]
    async fn load_fetches_current_revision() {
        let backend = support::backend();
        let view = app1_view(&backend).await;

        assert_eq!(view.name().as_str(), "app1");
        assert_eq!(view.task_definition().revision_name(), "production-app1:1");
        assert_eq!(view.deployments().len(), 1);
        assert!(view.load_balancers().is_empty());
        assert!(view.recent_events(3).is_empty());
    }

    #[tokio::test]
    async fn update_desired_count_sends_scale_only() {
        let backend = support::backend();
        let view = app1_view(&backend).await;

        view.update_desired_count(4).await.unwrap();

        let updates = backend.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].desired_count, Some(4));
        assert!(updates[0].task_definition.is_none());
        assert!(!updates[0].force_new_deployment);
        let service = backend
            .describe_service(&ClusterName::new(CLUSTER), &ServiceName::new("app1"))
            .await
            .unwrap();
        assert_eq!(service.desired_count, 4);
    }

    #[tokio::test]
    async fn negative_count_is_rejected_by_backend() {
        let backend = support::backend();
        let view = app1_view(&backend).await;

        let err = view.update_desired_count(-1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert!(backend.updates().is_empty());
    }

    #[tokio::test]
    async fn view_is_not_refreshed_after_update() {
        let backend = support::backend();
        let view = app1_view(&backend).await;

        view.update_desired_count(2).await.unwrap();

        assert_eq!(view.snapshot().desired_count, 1);
        assert_eq!(app1_view(&backend).await.snapshot().desired_count, 2);
    }
}

mod environment {
    use super::*;

    #[tokio::test]
    async fn edited_environment_registers_new_revision() {
        let backend = support::backend();
        let view = app1_view(&backend).await;
        let container = &view.task_definition().containers()[0];

        let pairs = parse_pairs(&["ENV=prod", "NEW=1"]).unwrap();
        let (environment, changes) = apply_pairs(container.environment(), &pairs);
        assert!(has_changes(&changes));
        assert!(changes.contains(&EnvChange::Updated {
            key: "ENV".to_string(),
            old: "dev".to_string(),
            new: "prod".to_string(),
        }));

        let mut candidate = view.task_definition().sanitized_copy();
        assert!(candidate.set_environment("app1", environment));
        let registered = view.register_task_definition(&candidate).await.unwrap();

        assert_eq!(registered.revision_name(), "production-app1:2");
        let env: Vec<(&str, &str)> = registered.containers()[0]
            .environment()
            .iter()
            .map(|kv| (kv.name().unwrap_or_default(), kv.value().unwrap_or_default()))
            .collect();
        assert_eq!(
            env,
            [
                ("TEST", "test"),
                ("ENV", "prod"),
                ("ROLE", "web"),
                ("KEY", "value"),
                ("NEW", "1"),
            ]
        );
        // Registering does not deploy.
        assert!(backend.updates().is_empty());
    }

    #[test]
    fn malformed_pair_is_rejected() {
        let err = parse_pairs(&["ENV"]).unwrap_err();
        assert_eq!(err.to_string(), "Not a valid pair: ENV");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
