// ABOUTME: Backend error types with SNAFU pattern.
// ABOUTME: Classifies ECS/ECR/ELB rejections into typed kinds for programmatic handling.

use snafu::Snafu;

/// A failed call to one of the AWS collaborators.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum BackendError {
    #[snafu(display("Cluster not found: {cluster}"))]
    ClusterNotFound { cluster: String },

    #[snafu(display("Service not found: {service} (cluster {cluster})"))]
    ServiceNotFound { cluster: String, service: String },

    #[snafu(display("Task not found: {task} (cluster {cluster})"))]
    TaskNotFound { cluster: String, task: String },

    #[snafu(display("Task definition not found: {reference}"))]
    TaskDefinitionNotFound { reference: String },

    #[snafu(display("Image not found: {repository}:{tag}"))]
    ImageNotFound { repository: String, tag: String },

    #[snafu(display("Access denied: {message}"))]
    AccessDenied { message: String },

    /// Any other rejection; carries the backend's own message.
    #[snafu(display("{message}"))]
    Rejected {
        code: Option<String>,
        message: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    ClusterNotFound,
    ServiceNotFound,
    TaskNotFound,
    TaskDefinitionNotFound,
    ImageNotFound,
    AccessDenied,
    Rejected,
}

impl BackendError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::ClusterNotFound { .. } => BackendErrorKind::ClusterNotFound,
            BackendError::ServiceNotFound { .. } => BackendErrorKind::ServiceNotFound,
            BackendError::TaskNotFound { .. } => BackendErrorKind::TaskNotFound,
            BackendError::TaskDefinitionNotFound { .. } => BackendErrorKind::TaskDefinitionNotFound,
            BackendError::ImageNotFound { .. } => BackendErrorKind::ImageNotFound,
            BackendError::AccessDenied { .. } => BackendErrorKind::AccessDenied,
            BackendError::Rejected { .. } => BackendErrorKind::Rejected,
        }
    }

    /// Backend error code, when the rejection carried one.
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { code, .. } => code.as_deref(),
            BackendError::AccessDenied { .. } => Some("AccessDeniedException"),
            _ => None,
        }
    }
}
