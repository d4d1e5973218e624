// ABOUTME: Sealed trait pattern for backend traits.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Sealed trait to prevent external implementations.
///
/// Only the AWS and in-memory backends implement the capability traits,
/// so new operations can be added without breaking downstream code.
pub trait Sealed {}
