// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines cluster, service, and task-definition subcommands and global flags.

use clap::{Args, Parser, Subcommand};
use ecstools::output::OutputMode;

#[derive(Parser)]
#[command(name = "ecs")]
#[command(about = "Deploy, scale, and monitor AWS ECS services")]
#[command(version, infer_subcommands = true)]
pub struct Cli {
    /// AWS profile
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// AWS region
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage clusters
    #[command(subcommand, infer_subcommands = true)]
    Cluster(ClusterCommand),

    /// Manage and deploy services
    #[command(subcommand, infer_subcommands = true)]
    Service(ServiceCommand),

    /// Manage task definitions
    #[command(subcommand, infer_subcommands = true)]
    TaskDefinition(TaskDefinitionCommand),
}

#[derive(Subcommand)]
pub enum ClusterCommand {
    /// List clusters
    Ls {
        /// Show ARNs
        #[arg(short = 'A', long)]
        arn: bool,
    },
}

/// Cluster and service (or service group) positional arguments.
#[derive(Args)]
pub struct Target {
    pub cluster: String,

    /// Service name, or group name with --group
    pub service: String,

    /// Treat SERVICE as a service group from the config file
    #[arg(short, long)]
    pub group: bool,
}

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// List services
    Ls {
        cluster: String,

        /// Show ARNs
        #[arg(short = 'A', long)]
        arn: bool,
    },

    /// Describe service
    Desc { cluster: String, service: String },

    /// Deploy image tags to a service or service group
    ///
    /// Tag N replaces the tag of container N. If every tag is already in the
    /// current task definition, the current revision is redeployed instead.
    /// Group deploys run one service at a time and stop at the first
    /// failure; services already deployed are not rolled back.
    Deploy {
        #[command(flatten)]
        target: Target,

        /// Image tags, one per container
        tags: Vec<String>,

        /// Update the desired number of tasks
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(0..))]
        count: Option<i32>,

        /// Stop monitoring once every service has completed
        #[arg(short, long)]
        exit_on_complete: bool,

        /// Do not monitor the rollout
        #[arg(long, conflicts_with = "exit_on_complete")]
        detach: bool,
    },

    /// Monitor services
    Top {
        #[command(flatten)]
        target: Target,

        /// Stop once every service has completed
        #[arg(short, long)]
        exit_on_complete: bool,
    },

    /// Scale a service
    Scale {
        cluster: String,
        service: String,

        #[arg(value_parser = clap::value_parser!(i32).range(0..))]
        count: i32,
    },

    /// Manage environment variables
    ///
    /// With no pairs, print the container's environment. With KEY=VALUE
    /// pairs, register a new revision with the edited environment.
    Env {
        cluster: String,
        service: String,

        /// KEY=VALUE pairs to set
        pairs: Vec<String>,

        /// Container to edit; required when there is more than one
        #[arg(short, long)]
        container: Option<String>,

        /// Deploy the new revision after registering it
        #[arg(long)]
        deploy: bool,

        /// Stop monitoring once the deployment has completed
        #[arg(short, long, requires = "deploy")]
        exit_on_complete: bool,
    },
    /// Open an ECS Exec session in a running task
    ///
    /// Runs `aws ecs execute-command`, so the AWS CLI and its Session
    /// Manager plugin must be installed.
    Exec {
        cluster: String,
        service: String,

        /// Command to run in the container
        #[arg(default_value = ecstools::exec::DEFAULT_COMMAND)]
        command: String,

        /// Container name; required when the task has more than one
        #[arg(short, long)]
        container: Option<String>,

        /// Task id or ARN; defaults to the first running task
        #[arg(short, long)]
        task: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TaskDefinitionCommand {
    /// List task definition families or revisions
    Ls {
        /// Family, or family:revision
        name: Option<String>,

        /// Number of revisions
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=100))]
        num: i32,

        /// Show ARNs
        #[arg(short = 'A', long)]
        arn: bool,

        /// Show repository URI for images
        #[arg(short = 'R', long)]
        repo: bool,

        /// Only list revision names
        #[arg(short = 'D', long)]
        no_details: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prefixes_select_subcommands() {
        let cli = Cli::try_parse_from(["ecs", "ser", "dep", "production", "app1", "v2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Service(ServiceCommand::Deploy { .. })
        ));
    }

    #[test]
    fn exec_defaults_to_a_shell() {
        let cli = Cli::try_parse_from(["ecs", "service", "exec", "production", "app1"]).unwrap();
        match cli.command {
            Commands::Service(ServiceCommand::Exec {
                command,
                container,
                task,
                ..
            }) => {
                assert_eq!(command, "/bin/bash");
                assert!(container.is_none());
                assert!(task.is_none());
            }
            _ => panic!("expected service exec"),
        }
    }

    #[test]
    fn negative_scale_count_is_rejected() {
        assert!(Cli::try_parse_from(["ecs", "service", "scale", "production", "app1", "-1"]).is_err());
    }
}
