// ABOUTME: Live rollout monitoring across one or more services.
// ABOUTME: Status evaluation, frame rendering, terminal screens, and the polling loop.

mod render;
mod runner;
mod screen;
mod status;

pub use render::{Frame, completion_line, format_elapsed, render};
pub use runner::{MonitorExit, MonitorOptions, RolloutMonitor, ctrl_c};
pub use screen::{PlainScreen, Screen, TerminalScreen};
pub use status::{
    DeploymentSummary, RolloutStatus, ServiceReport, ServiceRollout, TargetGroupHealth,
};
