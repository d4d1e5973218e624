// ABOUTME: Builds the text frame of the live rollout view.
// ABOUTME: Lines are appended to an explicit Frame in service order; no global cursor.

use super::status::{ServiceReport, ServiceRollout};
use std::time::Duration;

/// One complete redraw: the service body plus the elapsed-time footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    body: Vec<String>,
    footer: String,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.body.push(line.into());
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn set_footer(&mut self, footer: String) {
        self.footer = footer;
    }

    /// Body and footer, in drawing order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.footer.as_str()))
    }
}

/// `HH:MM:SS`; hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

pub fn completion_line(elapsed: Duration) -> String {
    format!("All services completed in {}", format_elapsed(elapsed))
}

/// Render every report in the order given.
pub fn render(reports: &[ServiceReport], elapsed: Duration) -> Frame {
    let mut frame = Frame::new();
    for report in reports {
        match report {
            ServiceReport::Rollout(rollout) => render_rollout(&mut frame, rollout),
            ServiceReport::Unavailable { service, error } => {
                frame.push(format!("{service}  unavailable: {error}"));
            }
        }
        frame.push("");
    }
    frame.set_footer(format!(
        "Elapsed: {}  (Ctrl-C to exit)",
        format_elapsed(elapsed)
    ));
    frame
}

fn render_rollout(frame: &mut Frame, rollout: &ServiceRollout) {
    frame.push(format!(
        "{} {}  desired: {} running: {} pending: {}  [{}]",
        rollout.cluster,
        rollout.service,
        rollout.desired,
        rollout.running,
        rollout.pending,
        rollout.status
    ));

    for d in &rollout.deployments {
        frame.push(format!(
            "  {:<8} {}  desired: {} running: {} pending: {}",
            d.status, d.revision, d.desired, d.running, d.pending
        ));
        for image in &d.images {
            frame.push(format!("{:10} - {image}", ""));
        }
    }

    for tg in &rollout.target_groups {
        frame.push(format!(
            "  Target Group: {}  {} {}  {}",
            tg.group,
            tg.container.as_deref().unwrap_or("-"),
            tg.port.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            tg.summary()
        ));
    }

    for event in &rollout.events {
        let at = event
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        frame.push(format!("  {at} {}", event.message));
    }
}
