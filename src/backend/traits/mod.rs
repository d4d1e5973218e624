// ABOUTME: Composable capability traits for the AWS collaborators.
// ABOUTME: Defines ServiceOps, TaskDefinitionOps, ImageOps, TargetHealthOps, and Backend.

mod images;
pub(crate) mod sealed;
mod services;
mod target_health;
mod task_definitions;

pub use images::ImageOps;
pub use services::ServiceOps;
pub use target_health::TargetHealthOps;
pub use task_definitions::TaskDefinitionOps;

/// Every capability the deploy and monitor engines need.
///
/// Implemented automatically for any type implementing all four traits.
pub trait Backend: ServiceOps + TaskDefinitionOps + ImageOps + TargetHealthOps {}

impl<T> Backend for T where T: ServiceOps + TaskDefinitionOps + ImageOps + TargetHealthOps {}
