// ABOUTME: Validated container image tag requested by a deploy.
// ABOUTME: Enforces the registry tag grammar: [A-Za-z0-9_][A-Za-z0-9_.-]{0,127}.

use std::fmt;
use thiserror::Error;

const MAX_TAG_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ImageTagError {
    #[error("image tag cannot be empty")]
    Empty,

    #[error("image tag exceeds {MAX_TAG_LEN} characters")]
    TooLong,

    #[error("image tag cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in image tag: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn new(value: &str) -> Result<Self, ImageTagError> {
        let trimmed = value.trim();
        let first = trimmed.chars().next().ok_or(ImageTagError::Empty)?;

        if trimmed.len() > MAX_TAG_LEN {
            return Err(ImageTagError::TooLong);
        }
        if first == '.' || first == '-' {
            return Err(ImageTagError::InvalidStart(first));
        }
        for c in trimmed.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(ImageTagError::InvalidChar(c));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ImageTag {
    type Err = ImageTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_semver_and_latest() {
        assert_eq!(ImageTag::new("v0.2").unwrap().as_str(), "v0.2");
        assert_eq!(ImageTag::new("latest").unwrap().as_str(), "latest");
        assert_eq!(ImageTag::new("build_42-rc.1").unwrap().as_str(), "build_42-rc.1");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(ImageTag::new("  v1 ").unwrap().as_str(), "v1");
    }

    #[test]
    fn rejects_leading_separator() {
        assert!(matches!(
            ImageTag::new("-v1"),
            Err(ImageTagError::InvalidStart('-'))
        ));
        assert!(matches!(
            ImageTag::new(".v1"),
            Err(ImageTagError::InvalidStart('.'))
        ));
    }

    #[test]
    fn rejects_colon_and_slash() {
        assert!(matches!(
            ImageTag::new("repo:v1"),
            Err(ImageTagError::InvalidChar(':'))
        ));
        assert!(matches!(
            ImageTag::new("a/b"),
            Err(ImageTagError::InvalidChar('/'))
        ));
    }

    #[test]
    fn rejects_overlong_tags() {
        let tag = "a".repeat(MAX_TAG_LEN + 1);
        assert!(matches!(ImageTag::new(&tag), Err(ImageTagError::TooLong)));
        assert!(ImageTag::new(&"a".repeat(MAX_TAG_LEN)).is_ok());
    }
}
