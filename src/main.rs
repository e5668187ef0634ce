//! archpkgs - Main entry point
//!
//! Parses flags, resolves settings, opens the install log, and hands the
//! reconciled plan to the installer. Only this file decides the exit code.

use anyhow::Context;
use std::process::ExitCode;
use tracing::{debug, info};

use archpkgs::cli::{Cli, ParsedArgs};
use archpkgs::error::Result as InstallResult;
use archpkgs::{
    load_package_list, reconcile, sanity, ExecutionMode, InstallError, Installer,
    InstallerOptions, LinePrompter, LogSink, PackageSource, RunOutcome, Settings, SystemRunner,
};

/// Initialize diagnostic logging on stderr. `RUST_LOG` overrides the default.
fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let cli = match Cli::parse_args() {
        ParsedArgs::Run(cli) => cli,
        ParsedArgs::Info(text) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        ParsedArgs::Error(text) => {
            eprint!("{}", text);
            return ExitCode::FAILURE;
        }
    };
    debug!("CLI arguments parsed: {:?}", cli);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve settings and open the log. Failures here happen before there is a
/// log to write to, so they surface through `main` on stderr only.
fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mode = cli.execution_mode();
    let settings = Settings::resolve(&cli.overrides()).context("Invalid configuration")?;
    info!("Resolved settings: {:?}", settings);

    let mut log = LogSink::open(&settings.log_file).with_context(|| {
        format!("Failed to open install log {}", settings.log_file.display())
    })?;
    log.log(format!(
        "archpkgs {} starting ({} mode)",
        env!("CARGO_PKG_VERSION"),
        mode
    ));

    match install(&settings, mode, &mut log) {
        Ok(RunOutcome::Completed) => {
            log.log("Installation complete");
            Ok(ExitCode::SUCCESS)
        }
        Ok(RunOutcome::NothingToDo) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            log.log(format!("ERROR: {}", e));
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(e.exit_code() as u8))
        }
    }
}

/// Load, reconcile, check the environment, and run the installer.
fn install(
    settings: &Settings,
    mode: ExecutionMode,
    log: &mut LogSink,
) -> InstallResult<RunOutcome> {
    let primary = load_package_list(&settings.pacman_list, PackageSource::Primary, log)?;
    let secondary = load_package_list(&settings.aur_list, PackageSource::Secondary, log)?;
    let plan = reconcile(&primary, &secondary);

    let mut runner = SystemRunner::new();
    let elevation = sanity::current_elevation();

    let check = sanity::verify_environment(&plan, settings.aur_helper, &runner, elevation);
    if !check.is_ok() {
        let problems = check.problems();
        for problem in &problems {
            log.log(format!("Pre-flight: {}", problem));
        }
        if !mode.is_dry_run() {
            return Err(InstallError::preflight(problems.join("; ")));
        }
        log.log("Continuing anyway: dry-run mode runs nothing");
    }

    let mut prompter = LinePrompter::stdio()?;
    let options = InstallerOptions {
        mode,
        helper: settings.aur_helper,
        elevation,
        build_root: settings.build_root.clone(),
    };

    Installer::new(&mut runner, &mut prompter, log, options).run(&plan)
}
