// ABOUTME: Phantom-typed identifiers for compile-time type safety.
// ABOUTME: Prevents accidental swapping of cluster names, service names, and target group ARNs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
pub enum ClusterMarker {}
pub enum ServiceMarker {}
pub enum TargetGroupMarker {}

/// A type-safe identifier that prevents accidental mixing of identifier kinds.
///
/// `deploy <cluster> <service>` takes two positional strings; keeping them
/// as distinct types means a cluster name can never be passed where a
/// service name is expected.
///
/// ```compile_fail
/// use ecstools::types::{ClusterName, ServiceName};
///
/// fn takes_service(_service: ServiceName) {}
/// takes_service(ClusterName::new("production"));
/// ```
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// T is only a marker, so these impls must not require T: Trait.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Id").field("value", &self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type ClusterName = Id<ClusterMarker>;
pub type ServiceName = Id<ServiceMarker>;
pub type TargetGroupArn = Id<TargetGroupMarker>;

impl TargetGroupArn {
    /// Short target group name: the second-to-last ARN segment
    /// (`.../targetgroup/<name>/<hash>`).
    pub fn group_name(&self) -> &str {
        let mut parts = self.value.rsplit('/');
        parts.next();
        parts.next().unwrap_or(&self.value)
    }
}
