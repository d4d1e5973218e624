// ABOUTME: Application-wide error types for ecstools.
// ABOUTME: Uses thiserror; backend failures are wrapped and flattened by kind().

use crate::backend::{BackendError, BackendErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Service group not found: {0}")]
    GroupNotFound(String),

    #[error("Config section not found: {0}")]
    ConfigSectionMissing(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("No running tasks for service {service} (cluster {cluster})")]
    NoRunningTasks { cluster: String, service: String },

    #[error("ECS Exec failed: {0}")]
    Exec(String),

    #[error("no AWS region configured; pass --region or set AWS_REGION")]
    NoRegion,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClusterNotFound,
    ServiceNotFound,
    /// No such task, or no running task to pick from.
    TaskNotFound,
    TaskDefinitionNotFound,
    ImageNotFound,
    GroupNotFound,
    ConfigSectionMissing,
    /// Any other backend rejection, access denials included.
    Backend,
    Validation,
    /// Local environment problems: config files, terminal, region, the
    /// AWS CLI used for exec sessions.
    Environment,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Backend(source) => match source.kind() {
                BackendErrorKind::ClusterNotFound => ErrorKind::ClusterNotFound,
                BackendErrorKind::ServiceNotFound => ErrorKind::ServiceNotFound,
                BackendErrorKind::TaskNotFound => ErrorKind::TaskNotFound,
                BackendErrorKind::TaskDefinitionNotFound => ErrorKind::TaskDefinitionNotFound,
                BackendErrorKind::ImageNotFound => ErrorKind::ImageNotFound,
                BackendErrorKind::AccessDenied | BackendErrorKind::Rejected => ErrorKind::Backend,
            },
            Error::GroupNotFound(_) => ErrorKind::GroupNotFound,
            Error::ConfigSectionMissing(_) => ErrorKind::ConfigSectionMissing,
            Error::NoRunningTasks { .. } => ErrorKind::TaskNotFound,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Exec(_) | Error::NoRegion | Error::Io(_) | Error::Yaml(_) => {
                ErrorKind::Environment
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
