// ABOUTME: Library root for ecstools - exposes the deploy and monitor engines.
// ABOUTME: The ecs binary is in main.rs.

pub mod backend;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod group;
pub mod monitor;
pub mod output;
pub mod resources;
pub mod types;
