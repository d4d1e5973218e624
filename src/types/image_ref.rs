// ABOUTME: Positional image reference parsing for task definition containers.
// ABOUTME: Splits `repo/image:tag` into its parts and rebuilds it with a new tag.

use serde::Serialize;
use std::fmt;

use super::ImageTag;

/// A container image reference split into `repo/image:tag`.
///
/// Parsing is positional: the repo is everything before the first `/`,
/// the image is the remainder up to its last `:`, and the tag is whatever
/// follows that `:` (empty when there is none). A trailing `@digest` is
/// split off before the tag. Nested repository paths such as
/// `acct.dkr.ecr.us-east-1.amazonaws.com/team/api:v1` keep `team/api` as
/// the image name, which is also the ECR repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageRef {
    repo: String,
    image: String,
    tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(uri: &str) -> Self {
        let (repo, remainder) = match uri.split_once('/') {
            Some((repo, rest)) => (repo, rest),
            None => ("", uri),
        };
        let (remainder, digest) = match remainder.split_once('@') {
            Some((name, digest)) => (name, Some(digest.to_string())),
            None => (remainder, None),
        };
        let (image, tag) = match remainder.rsplit_once(':') {
            Some((image, tag)) => (image, tag),
            None => (remainder, ""),
        };

        Self {
            repo: repo.to_string(),
            image: image.to_string(),
            tag: tag.to_string(),
            digest,
        }
    }

    /// Registry host or account prefix (empty for bare references).
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Image path below the registry; the ECR repository name.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Tag, or the empty string when the reference carries none.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Content digest (`sha256:...`) when the reference is pinned.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The same image with a different tag. A pinned digest is dropped so
    /// the new tag is what gets pulled.
    pub fn with_tag(&self, tag: &ImageTag) -> Self {
        Self {
            repo: self.repo.clone(),
            image: self.image.clone(),
            tag: tag.to_string(),
            digest: None,
        }
    }

    /// `image:tag` without the registry prefix, as shown in listings.
    pub fn short(&self) -> String {
        let mut short = self.image.clone();
        if !self.tag.is_empty() {
            short.push(':');
            short.push_str(&self.tag);
        }
        if let Some(digest) = &self.digest {
            short.push('@');
            short.push_str(digest);
        }
        short
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.repo.is_empty() {
            write!(f, "{}/", self.repo)?;
        }
        write!(f, "{}", self.short())
    }
}
