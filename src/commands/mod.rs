// ABOUTME: Command module aggregator for the ecs CLI.
// ABOUTME: Shared command context plus cluster, service, deploy, exec, and task-definition handlers.

pub mod cluster;
mod connection;
mod deploy;
pub mod exec;
pub mod service;
pub mod task_definition;
mod watch;

pub use deploy::deploy;

use ecstools::config::Config;
use ecstools::output::Output;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: Config,
    pub output: Output,
    /// `--profile`, overriding the config file.
    pub profile: Option<String>,
    /// `--region`, overriding the config file.
    pub region: Option<String>,
}
