// ABOUTME: Polling loop of the live rollout view.
// ABOUTME: Fetches services concurrently per refresh, redraws every tick, stops on cancel or completion.

use super::render::{Frame, completion_line, render};
use super::screen::Screen;
use super::status::{
    DeploymentSummary, RolloutStatus, ServiceReport, ServiceRollout, TargetGroupHealth,
};
use crate::backend::{Backend, BackendError};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::resources::TaskDefinitionView;
use crate::types::{ClusterName, ServiceName};
use futures::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

/// Timing and termination settings of one monitor run.
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub poll_interval: Duration,
    /// Backend state is re-fetched every this many ticks.
    pub refresh_every: u32,
    pub events: usize,
    pub exit_on_complete: bool,
}

impl MonitorOptions {
    pub fn from_config(config: &MonitorConfig, exit_on_complete: bool) -> Self {
        Self {
            poll_interval: config.poll_interval,
            refresh_every: config.refresh_every.max(1),
            events: config.events,
            exit_on_complete,
        }
    }
}

/// Why the monitor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    Completed,
    Cancelled,
}

pub struct RolloutMonitor<'a, B: ?Sized> {
    backend: &'a B,
    cluster: ClusterName,
    services: Vec<ServiceName>,
    options: MonitorOptions,
}

impl<'a, B: Backend + ?Sized> RolloutMonitor<'a, B> {
    pub fn new(
        backend: &'a B,
        cluster: ClusterName,
        services: Vec<ServiceName>,
        options: MonitorOptions,
    ) -> Self {
        Self {
            backend,
            cluster,
            services,
            options,
        }
    }

    /// Fetch every tracked service once. Results keep caller order; a
    /// failed fetch becomes an `Unavailable` report.
    pub async fn poll(&self) -> Vec<ServiceReport> {
        let fetches = self.services.iter().map(|service| async move {
            match self.fetch(service).await {
                Ok(rollout) => ServiceReport::Rollout(rollout),
                Err(e) => {
                    // rendered in the frame; stderr may be the terminal being redrawn
                    tracing::debug!(
                        cluster = %self.cluster,
                        %service,
                        error = %e,
                        "service fetch failed"
                    );
                    ServiceReport::Unavailable {
                        service: service.clone(),
                        error: e.to_string(),
                    }
                }
            }
        });
        join_all(fetches).await
    }

    async fn fetch(&self, name: &ServiceName) -> std::result::Result<ServiceRollout, BackendError> {
        let service = self.backend.describe_service(&self.cluster, name).await?;

        let mut images_by_revision: HashMap<&str, Vec<String>> = HashMap::new();
        for d in &service.deployments {
            if images_by_revision.contains_key(d.task_definition.as_str()) {
                continue;
            }
            let td = self
                .backend
                .describe_task_definition(&d.task_definition)
                .await?;
            let view = TaskDefinitionView::new(td);
            let images = view.images().into_iter().map(|i| i.image.short()).collect();
            images_by_revision.insert(d.task_definition.as_str(), images);
        }

        let mut target_groups = Vec::new();
        for (lb, arn) in service.target_groups() {
            let states = self.backend.describe_target_health(arn).await?;
            target_groups.push(TargetGroupHealth::tally(lb, arn, &states));
        }

        let deployments = service
            .deployments
            .iter()
            .map(|d| DeploymentSummary {
                status: d.status.clone(),
                revision: d.task_definition_revision().to_string(),
                desired: d.desired_count,
                running: d.running_count,
                pending: d.pending_count,
                images: images_by_revision
                    .get(d.task_definition.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        let status = RolloutStatus::evaluate(&service, &target_groups);
        Ok(ServiceRollout {
            cluster: service.cluster_name().to_string(),
            service: service.name.clone(),
            desired: service.desired_count,
            running: service.running_count,
            pending: service.pending_count,
            deployments,
            target_groups,
            events: service
                .events
                .iter()
                .take(self.options.events)
                .cloned()
                .collect(),
            status,
        })
    }

    /// Run until cancelled or, with `exit_on_complete`, until every service
    /// completes.
    ///
    /// The elapsed-time footer is redrawn every tick; backend state only
    /// every `refresh_every` ticks. Cancellation is checked before each
    /// fetch and during every sleep.
    pub async fn run<S, C>(&self, screen: &mut S, cancel: C) -> Result<MonitorExit>
    where
        S: Screen + ?Sized,
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let started = Instant::now();
        let refresh_every = u64::from(self.options.refresh_every.max(1));
        let mut reports: Vec<ServiceReport> = Vec::new();
        let mut tick: u64 = 0;

        loop {
            if tick % refresh_every == 0 {
                tokio::select! {
                    biased;
                    _ = &mut cancel => return Ok(MonitorExit::Cancelled),
                    polled = self.poll() => reports = polled,
                }
            }

            let frame: Frame = render(&reports, started.elapsed());
            screen.draw(&frame)?;

            if self.options.exit_on_complete
                && !reports.is_empty()
                && reports.iter().all(ServiceReport::is_completed)
            {
                screen.finish(&completion_line(started.elapsed()))?;
                tracing::debug!(ticks = tick + 1, "all services completed");
                return Ok(MonitorExit::Completed);
            }

            tokio::select! {
                biased;
                _ = &mut cancel => return Ok(MonitorExit::Cancelled),
                _ = tokio::time::sleep(self.options.poll_interval) => {}
            }
            tick += 1;
        }
    }
}

/// Resolves on the first Ctrl-C. Never resolves if the handler cannot be
/// installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
