//! `autosnip`: fills new React component files and keeps index files in sync.

mod args;
mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use autosnip_components::{ComponentHandler, Engine, ProjectProfile, TemplateSource};
use autosnip_directory_watcher::{WatchCoordinator, WatchMode, WatchTarget};
use clap::Parser;
use tracing::{error, info, warn};

use crate::args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to read the working directory")?;

    let coordinator = WatchCoordinator::resolve(
        cli.targets(&cwd)
            .context("failed to resolve watch directories")?,
    )
    .context("invalid watch configuration")?;

    let project_root = cli
        .project_root(&cwd)
        .context("failed to resolve the project root")?;
    let project = ProjectProfile::detect(&project_root).await;
    info!(
        "Project: {:?}{}",
        project.kind,
        if project.typescript { " (TypeScript)" } else { "" }
    );

    let templates = TemplateSource::resolve(cli.template.as_deref(), project)
        .await
        .context("failed to load template")?;

    let settings = cli.handler_settings(project);
    if settings.remove_style && settings.style.is_none() {
        warn!("--remove-style has no effect without --style");
    }
    let mut engine = Engine::new(ComponentHandler::new(settings, templates, project));

    let mode = if cli.watch {
        WatchMode::Continuous
    } else {
        WatchMode::Once
    };
    let mut session = coordinator
        .establish(mode)
        .context("failed to start watching")?;

    match mode {
        WatchMode::Once => {
            engine
                .run(&mut session)
                .await
                .context("failed to update components")?;
        }
        WatchMode::Continuous => {
            for line in watching_lines(coordinator.targets()) {
                info!("{line}");
            }
            tokio::select! {
                result = engine.run(&mut session) => {
                    result.context("failed to update components")?;
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.context("failed to listen for ctrl-c")?;
                    info!("Received ctrl-c, shutting down");
                }
            }
            session.close();
        }
    }

    Ok(())
}

/// One line per target that stays watched after the initial pass.
fn watching_lines(targets: &[Arc<WatchTarget>]) -> Vec<String> {
    targets
        .iter()
        .map(|target| {
            format!(
                "Watching directory {} (snippet depth {}, index depth {})",
                target.path.display(),
                target.snippet_depth,
                target.index_depth
            )
        })
        .collect()
}
