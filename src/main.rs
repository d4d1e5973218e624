// ABOUTME: Entry point for the ecs CLI application.
// ABOUTME: Loads config, expands aliases, parses arguments, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, ClusterCommand, Commands, ServiceCommand, TaskDefinitionCommand};
use commands::Context;
use commands::exec::ExecArgs;
use commands::service::EnvArgs;
use commands::task_definition::LsArgs;
use ecstools::config::{Config, expand_alias};
use ecstools::error::Result;
use ecstools::output::Output;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let args = expand_alias(env::args().collect(), &config.aliases());
    let cli = Cli::parse_from(args);

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = Context {
        config,
        output: Output::new(cli.output_mode()),
        profile: cli.profile,
        region: cli.region,
    };

    if let Err(e) = run(cli.command, &mut ctx).await {
        ctx.output.error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config() -> Result<Config> {
    let cwd = env::current_dir()?;
    let home = dirs::home_dir();
    Config::discover(home.as_deref(), &cwd)
}

async fn run(command: Commands, ctx: &mut Context) -> Result<()> {
    match command {
        Commands::Cluster(ClusterCommand::Ls { arn }) => commands::cluster::ls(ctx, arn).await,
        Commands::Service(command) => match command {
            ServiceCommand::Ls { cluster, arn } => commands::service::ls(ctx, cluster, arn).await,
            ServiceCommand::Desc { cluster, service } => {
                commands::service::desc(ctx, cluster, service).await
            }
            ServiceCommand::Deploy {
                target,
                tags,
                count,
                exit_on_complete,
                detach,
            } => commands::deploy(ctx, target, tags, count, exit_on_complete, detach).await,
            ServiceCommand::Top {
                target,
                exit_on_complete,
            } => commands::service::top(ctx, target, exit_on_complete).await,
            ServiceCommand::Scale {
                cluster,
                service,
                count,
            } => commands::service::scale(ctx, cluster, service, count).await,
            ServiceCommand::Env {
                cluster,
                service,
                pairs,
                container,
                deploy,
                exit_on_complete,
            } => {
                let args = EnvArgs {
                    cluster,
                    service,
                    pairs,
                    container,
                    deploy,
                    exit_on_complete,
                };
                commands::service::env(ctx, args).await
            }
            ServiceCommand::Exec {
                cluster,
                service,
                command,
                container,
                task,
            } => {
                let args = ExecArgs {
                    cluster,
                    service,
                    command,
                    container,
                    task,
                };
                commands::exec::exec(ctx, args).await
            }
        },
        Commands::TaskDefinition(TaskDefinitionCommand::Ls {
            name,
            num,
            arn,
            repo,
            no_details,
        }) => {
            let args = LsArgs {
                name,
                num,
                arn,
                repo,
                no_details,
            };
            commands::task_definition::ls(ctx, args).await
        }
    }
}
