mod cli;
mod config;
mod controller;
mod effects;
mod logging;
mod render;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use extractor_core::{Document, Msg, Phase};
use extractor_engine::{load_document, ReqwestUploader};
use extractor_logging::{extractor_info, extractor_warn};
use log::LevelFilter;

use crate::cli::{Cli, Commands, ExtractArgs};
use crate::config::ClientConfig;
use crate::controller::Controller;
use crate::logging::LogDestination;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file.clone();
    }

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.level()
    };
    logging::initialize(LogDestination::from_file(config.log_file.as_deref()), level);
    extractor_info!("Using extraction service at {}", config.base_url);

    match cli.command {
        Commands::Extract(args) => run_extract(&config, args),
        Commands::Health => run_health(&config),
    }
}

fn run_extract(config: &ClientConfig, args: ExtractArgs) -> anyhow::Result<ExitCode> {
    let file = load_document(&args.path, args.content_type.as_deref())
        .with_context(|| format!("could not load {}", args.path.display()))?;
    let document = Document::new(file.file_name, file.content_type, file.bytes);

    let mut controller = Controller::new(config.upload_settings());
    controller.dispatch(Msg::DocumentSelected(document));
    if controller.view().rejected {
        print!("{}", render::render(&controller.view()));
        return Ok(ExitCode::from(2));
    }

    controller.dispatch(Msg::SubmitRequested);
    controller.wait_until_settled();
    controller.dispatch(Msg::ResultTabSelected(args.tab.into()));

    let view = controller.view();
    match (&view.result, args.json) {
        (Some(result), true) => println!("{}", render::render_json(result)),
        _ => print!("{}", render::render(&view)),
    }

    if controller.state().phase() == Phase::Succeeded {
        Ok(ExitCode::SUCCESS)
    } else {
        extractor_warn!("Extraction of {} did not succeed", args.path.display());
        Ok(ExitCode::FAILURE)
    }
}

fn run_health(config: &ClientConfig) -> anyhow::Result<ExitCode> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let uploader = ReqwestUploader::new(config.upload_settings());
    let report = runtime
        .block_on(uploader.health())
        .context("health check failed")?;

    print!("{}", render::render_health(&report));
    if report.is_healthy() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
