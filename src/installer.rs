//! Install orchestration
//!
//! Drives an [`InstallPlan`] through a fixed, forward-only sequence of stages:
//!
//! ```text
//! ConfirmPlan
//!     ↓
//! SystemUpdate          (pacman -Syu)
//!     ↓
//! PrimaryInstall        (pacman -S --needed ...)
//!     ↓
//! EnsureSecondaryTool   (bootstrap the AUR helper if missing)
//!     ↓
//! SecondaryInstall      (<helper> -S --needed ...)
//!     ↓
//! Done
//!
//! (A declined confirmation or any failed command ends the run with an error)
//! ```
//!
//! Stages with nothing to do are skipped and logged as skipped. Every stage
//! returns a [`StageOutcome`] or an [`InstallError`]; the installer never
//! exits the process itself.

use std::fmt;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::commands::{
    CommandArgs, Elevation, GitCloneArgs, HelperInstallArgs, MakepkgArgs, PacmanInstallArgs,
    SystemUpgradeArgs,
};
use crate::error::{InstallError, Result};
use crate::log_sink::LogSink;
use crate::prompt::Prompter;
use crate::reconcile::InstallPlan;
use crate::runner::CommandRunner;
use crate::types::{AurHelper, ExecutionMode, PackageName};

/// Installation stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallStage {
    /// Show the reconciled plan and ask to proceed
    ConfirmPlan,
    /// Full system upgrade before installing from the repositories
    SystemUpdate,
    /// Batch install of the pacman list
    PrimaryInstall,
    /// Make sure the AUR helper exists, building it if needed
    EnsureSecondaryTool,
    /// Batch install of the AUR list
    SecondaryInstall,
    /// Nothing left to run
    Done,
}

impl InstallStage {
    /// The stage that follows this one. `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::ConfirmPlan => Self::SystemUpdate,
            Self::SystemUpdate => Self::PrimaryInstall,
            Self::PrimaryInstall => Self::EnsureSecondaryTool,
            Self::EnsureSecondaryTool => Self::SecondaryInstall,
            Self::SecondaryInstall | Self::Done => Self::Done,
        }
    }

    /// Human-readable stage name for the log
    pub fn description(&self) -> &'static str {
        match self {
            Self::ConfirmPlan => "plan confirmation",
            Self::SystemUpdate => "system update",
            Self::PrimaryInstall => "pacman install",
            Self::EnsureSecondaryTool => "AUR helper check",
            Self::SecondaryInstall => "AUR install",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// What a single stage did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    /// The stage had no targets
    Skipped,
}

/// How a whole run ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage completed or was skipped
    Completed,
    /// Both lists were empty; nothing was asked or run
    NothingToDo,
}

/// Settings for one installer run that are not part of the plan.
#[derive(Debug, Clone)]
pub struct InstallerOptions {
    pub mode: ExecutionMode,
    pub helper: AurHelper,
    pub elevation: Elevation,
    /// Directory the bootstrap creates its own throwaway build directory in
    pub build_root: PathBuf,
}

/// Runs an install plan against a runner and a prompter.
pub struct Installer<'a> {
    runner: &'a mut dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
    log: &'a mut LogSink,
    options: InstallerOptions,
}

impl<'a> Installer<'a> {
    pub fn new(
        runner: &'a mut dyn CommandRunner,
        prompter: &'a mut dyn Prompter,
        log: &'a mut LogSink,
        options: InstallerOptions,
    ) -> Self {
        Self {
            runner,
            prompter,
            log,
            options,
        }
    }

    /// Run every stage in order, stopping at the first error.
    pub fn run(&mut self, plan: &InstallPlan) -> Result<RunOutcome> {
        for name in &plan.overridden {
            self.log.log(format!(
                "Skipping {} from the aur list: already in the pacman list",
                name
            ));
        }

        if plan.is_empty() {
            self.log.log("Nothing to install: both package lists are empty");
            return Ok(RunOutcome::NothingToDo);
        }

        let mut stage = InstallStage::ConfirmPlan;
        while stage != InstallStage::Done {
            tracing::debug!("Entering stage: {:?}", stage);
            match self.run_stage(stage, plan)? {
                StageOutcome::Completed => tracing::debug!("Stage {:?} completed", stage),
                StageOutcome::Skipped => {
                    self.log.log(format!("Skipping {}: nothing to install", stage));
                }
            }
            stage = stage.next();
        }

        self.log.log(format!("Done: {} package(s) processed", plan.len()));
        Ok(RunOutcome::Completed)
    }

    fn run_stage(&mut self, stage: InstallStage, plan: &InstallPlan) -> Result<StageOutcome> {
        match stage {
            InstallStage::ConfirmPlan => self.confirm_plan(plan),
            InstallStage::SystemUpdate => self.system_update(plan),
            InstallStage::PrimaryInstall => self.primary_install(plan),
            InstallStage::EnsureSecondaryTool => self.ensure_secondary_tool(plan),
            InstallStage::SecondaryInstall => self.secondary_install(plan),
            InstallStage::Done => Ok(StageOutcome::Completed),
        }
    }

    // ------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------

    fn confirm_plan(&mut self, plan: &InstallPlan) -> Result<StageOutcome> {
        self.log.log(format!(
            "Plan: {} pacman package(s): {}",
            plan.primary_targets.len(),
            join_names(&plan.primary_targets)
        ));
        self.log.log(format!(
            "Plan: {} {} package(s): {}",
            plan.secondary_targets.len(),
            self.options.helper,
            join_names(&plan.secondary_targets)
        ));

        self.confirm("Proceed with installation?")?;
        Ok(StageOutcome::Completed)
    }

    fn system_update(&mut self, plan: &InstallPlan) -> Result<StageOutcome> {
        if plan.primary_targets.is_empty() {
            return Ok(StageOutcome::Skipped);
        }

        self.log.log("Updating the system before installing");
        self.execute(&SystemUpgradeArgs {
            noconfirm: self.noconfirm(),
        })?;
        Ok(StageOutcome::Completed)
    }

    fn primary_install(&mut self, plan: &InstallPlan) -> Result<StageOutcome> {
        if plan.primary_targets.is_empty() {
            return Ok(StageOutcome::Skipped);
        }

        self.log.log(format!(
            "Installing {} pacman package(s)",
            plan.primary_targets.len()
        ));
        self.execute(&PacmanInstallArgs {
            packages: plan.primary_targets.clone(),
            noconfirm: self.noconfirm(),
        })?;
        Ok(StageOutcome::Completed)
    }

    fn ensure_secondary_tool(&mut self, plan: &InstallPlan) -> Result<StageOutcome> {
        if plan.secondary_targets.is_empty() {
            return Ok(StageOutcome::Skipped);
        }

        let helper = self.options.helper;
        if self.runner.is_available(helper.binary()) {
            self.log.log(format!("{} is already installed", helper));
            return Ok(StageOutcome::Completed);
        }

        self.log.log(format!(
            "{} was not found; it has to be built from the AUR",
            helper
        ));
        self.confirm(&format!(
            "Build and install {} from {} with makepkg?",
            helper,
            helper.aur_url()
        ))?;

        // Removed when `workspace` drops at the end of this stage
        let workspace = self.bootstrap_workspace()?;
        let recipe_dir = match &workspace {
            Some(dir) => dir.path().join(helper.binary()),
            None => self
                .options
                .build_root
                .join(format!("archpkgs-{}-XXXXXX", helper))
                .join(helper.binary()),
        };

        self.execute(&GitCloneArgs {
            url: helper.aur_url(),
            destination: recipe_dir.clone(),
        })?;
        self.execute(&MakepkgArgs {
            build_dir: recipe_dir,
            noconfirm: self.noconfirm(),
        })?;

        if self.options.mode.is_dry_run() {
            return Ok(StageOutcome::Completed);
        }

        if !self.runner.is_available(helper.binary()) {
            return Err(InstallError::missing_tool(helper.binary()));
        }
        self.log.log(format!("{} installed", helper));
        Ok(StageOutcome::Completed)
    }

    fn secondary_install(&mut self, plan: &InstallPlan) -> Result<StageOutcome> {
        if plan.secondary_targets.is_empty() {
            return Ok(StageOutcome::Skipped);
        }

        self.log.log(format!(
            "Installing {} AUR package(s) with {}",
            plan.secondary_targets.len(),
            self.options.helper
        ));
        self.execute(&HelperInstallArgs {
            helper: self.options.helper,
            packages: plan.secondary_targets.clone(),
            noconfirm: self.noconfirm(),
        })?;
        Ok(StageOutcome::Completed)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Fresh, uniquely named directory under `build_root` for the bootstrap.
    /// Nothing is created in dry-run mode.
    fn bootstrap_workspace(&self) -> Result<Option<TempDir>> {
        if self.options.mode.is_dry_run() {
            return Ok(None);
        }

        let root = &self.options.build_root;
        std::fs::create_dir_all(root)?;
        let workspace = tempfile::Builder::new()
            .prefix(&format!("archpkgs-{}-", self.options.helper))
            .tempdir_in(root)?;
        tracing::debug!("Bootstrap workspace: {}", workspace.path().display());
        Ok(Some(workspace))
    }

    /// Ask `question` unless the mode answers for us. A "no" is an abort.
    fn confirm(&mut self, question: &str) -> Result<()> {
        if self.options.mode.auto_confirms() {
            self.log.log(format!(
                "{} yes (auto-confirmed, {} mode)",
                question, self.options.mode
            ));
            return Ok(());
        }

        if self.prompter.confirm(question)? {
            self.log.log(format!("{} yes", question));
            Ok(())
        } else {
            self.log.log(format!("{} no", question));
            Err(InstallError::user_abort(question))
        }
    }

    /// Run a command, or only log it in dry-run mode.
    fn execute(&mut self, args: &dyn CommandArgs) -> Result<()> {
        let invocation = args.invocation(self.options.elevation);

        if self.options.mode.is_dry_run() {
            self.log.log(format!("[dry-run] would run: {}", invocation));
            return Ok(());
        }

        self.log.log(format!("Running: {}", invocation));
        let output = self.runner.run(&invocation)?;
        output.ensure_success(&invocation)?;
        self.log.log(format!("Finished: {}", invocation));
        Ok(())
    }

    /// `--noconfirm` is forwarded only when the user asked for `--yes`
    fn noconfirm(&self) -> bool {
        self.options.mode == ExecutionMode::AssumeYes
    }
}

fn join_names(names: &[PackageName]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names
        .iter()
        .map(PackageName::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
