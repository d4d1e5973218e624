// ABOUTME: Image repository operations.
// ABOUTME: Verifies a tag exists in a repository before it is deployed.

use super::sealed::Sealed;
use crate::backend::BackendError;
use crate::types::ImageTag;
use async_trait::async_trait;

/// Image repository operations.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Succeeds when `repository` holds an image tagged `tag`.
    ///
    /// Fails with `ImageNotFound` otherwise.
    async fn verify_image(&self, repository: &str, tag: &ImageTag) -> Result<(), BackendError>;
}
