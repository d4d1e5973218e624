// ABOUTME: Runs the live rollout view for a command.
// ABOUTME: Picks an in-place terminal screen or a plain line screen and reports how it ended.

use super::Context;
use ecstools::backend::Backend;
use ecstools::error::Result;
use ecstools::monitor::{
    MonitorExit, MonitorOptions, PlainScreen, RolloutMonitor, TerminalScreen, ctrl_c,
};
use ecstools::types::{ClusterName, ServiceName};
use std::io::{self, IsTerminal};

/// Monitor `services` until Ctrl-C or, with `exit_on_complete`, until
/// every service completes. Both endings are successes.
pub async fn watch<B: Backend + ?Sized>(
    backend: &B,
    ctx: &Context,
    cluster: &ClusterName,
    services: Vec<ServiceName>,
    exit_on_complete: bool,
) -> Result<MonitorExit> {
    let options = MonitorOptions::from_config(&ctx.config.monitor(), exit_on_complete);
    let monitor = RolloutMonitor::new(backend, cluster.clone(), services, options);

    let exit = if ctx.output.is_interactive() && io::stdout().is_terminal() {
        let mut screen = TerminalScreen::new(io::stdout())?;
        monitor.run(&mut screen, ctrl_c()).await?
    } else if ctx.output.is_interactive() {
        let mut screen = PlainScreen::new(io::stdout());
        monitor.run(&mut screen, ctrl_c()).await?
    } else {
        // keep stdout for results in quiet and json modes
        let mut screen = PlainScreen::new(io::stderr());
        monitor.run(&mut screen, ctrl_c()).await?
    };

    tracing::debug!(?exit, "monitor stopped");
    Ok(exit)
}
