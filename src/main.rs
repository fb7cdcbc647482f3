//! sftp-deploy CLI
//!
//! Usage: sftp-deploy [--skip-build] [--skip-git] [--fix-only] [OPTIONS]
//!
//! Builds the project, pushes it, waits for the host's auto-deploy, then
//! mirrors the build output over SFTP and repairs the public directory.

mod ui;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use sftp_deploy::config::{load_layered, ConfigSource};
use sftp_deploy::infrastructure::{JsonEventSink, SystemCommandRunner, ThreadSleeper};
use sftp_deploy::presentation::{create_connector, Cli};
use sftp_deploy::{DeployError, DeployEventSink, Pipeline};

use ui::blocks::error::ErrorBlock;
use ui::console::ConsoleEventSink;
use ui::context::UiContext;
use ui::primitives::icon::Icon;

/// Exit status after Ctrl+C, as shells report SIGINT
const EXIT_INTERRUPTED: i32 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ui = UiContext::new(cli.json, cli.verbose, cli.color);

    if let Err(e) = install_interrupt_handler(ui) {
        eprintln!(
            "{} Could not install Ctrl+C handler: {}",
            Icon::Warning.colored(ui.color, ui.unicode),
            e
        );
    }

    match run(&cli, ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err, ui);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, ui: UiContext) -> Result<()> {
    let project = cli.project.as_path();
    let (config, source, warnings) =
        load_layered(cli.config.as_deref(), project, |key| std::env::var(key).ok())?;

    for warning in &warnings {
        eprintln!(
            "{} {}",
            Icon::Warning.colored(ui.color, ui.unicode),
            warning
        );
    }
    if ui.verbose > 0 && !ui.json {
        match &source {
            ConfigSource::File(path) => eprintln!("Config: {}", path.display()),
            ConfigSource::Defaults => eprintln!("Config: built-in defaults"),
        }
    }

    config.validate(cli.uses_sftp())?;

    let connector = create_connector(&config, cli.local_root.as_deref());
    let runner = SystemCommandRunner::new().stdout_to_stderr(ui.json);
    let sleeper = ThreadSleeper;
    let sink: Box<dyn DeployEventSink> = if ui.json {
        Box::new(JsonEventSink::stdout())
    } else {
        Box::new(ConsoleEventSink::stdout(ui))
    };

    Pipeline::new(&config, project, &runner, &sleeper)
        .with_flags(cli.run_flags())
        .run(connector.as_ref(), sink.as_ref())?;
    Ok(())
}

fn report_fatal(err: &anyhow::Error, ui: UiContext) {
    if ui.json {
        let hint = err.downcast_ref::<DeployError>().and_then(DeployError::hint);
        println!(
            "{}",
            serde_json::json!({
                "event": "error",
                "message": format!("{:#}", err),
                "hint": hint,
            })
        );
        return;
    }
    eprint!("{}", ErrorBlock::from_error(err).render(ui.color, ui.unicode));
}

/// Ctrl+C ends the run at once; an open remote session is not closed.
fn install_interrupt_handler(ui: UiContext) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        eprintln!(
            "\n{} Interrupted, the remote may be partially updated",
            Icon::Warning.colored(ui.color, ui.unicode)
        );
        std::process::exit(EXIT_INTERRUPTED);
    })
}
