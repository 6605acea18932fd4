// ABOUTME: Command handlers for the hive binary, wiring config, tmux, templates, and prompts
// This is the only layer that turns library errors into anyhow errors for the user

pub mod runner;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::{Command, TemplateAction};
use crate::config::AppConfig;
use crate::discovery;
use crate::models::{self, ConfigError, SessionSpec, ValidationErrors};
use crate::prompt::{PromptError, Prompter, StdinPrompter};
use crate::templates::{builtin, TemplateStore};
use crate::tmux::{self, Multiplexer, TmuxCli, TmuxError};

pub use runner::{ForegroundRunner, ProcessRunner};

#[derive(Serialize)]
struct ValidationReport<'a> {
    path: &'a Path,
    valid: bool,
    errors: &'a ValidationErrors,
}

const KILL_WARNING: &str = "This will terminate the session and all processes running in it.";

pub struct App {
    config: AppConfig,
    cwd: PathBuf,
    config_path: Option<PathBuf>,
    mux: Box<dyn Multiplexer>,
    prompter: Box<dyn Prompter>,
    runner: Box<dyn ForegroundRunner>,
    templates: TemplateStore,
}

impl App {
    /// App talking to the real tmux binary and the real terminal.
    pub fn new(config: AppConfig, cwd: PathBuf) -> Self {
        let mux = TmuxCli::with_binary(config.tmux.binary.clone());
        let templates = TemplateStore::new(config.templates.dir.clone());
        Self {
            config,
            cwd,
            config_path: None,
            mux: Box::new(mux),
            prompter: Box::new(StdinPrompter::stdio()),
            runner: Box::new(ProcessRunner),
            templates,
        }
    }

    /// Use this config file instead of discovering one.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_multiplexer(mut self, mux: Box<dyn Multiplexer>) -> Self {
        self.mux = mux;
        self
    }

    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn with_runner(mut self, runner: Box<dyn ForegroundRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    /// Run one command. YAML and listings go to `out`; progress goes to the log.
    pub fn run(&mut self, command: Command, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::Launch => self.launch(),
            Command::Relaunch => self.relaunch(),
            Command::Clear => self.clear(),
            Command::Validate { json } => self.validate(json, out),
            Command::Generate { template, output } => {
                self.generate(template.as_deref(), output.as_deref(), out)
            }
            Command::Export { output } => self.export(output.as_deref(), out),
            Command::Config => self.edit_config(),
            Command::Template { action } => self.template(action, out),
            Command::Version => version(out),
        }
    }

    fn discover(&self) -> Result<PathBuf> {
        discovery::discover(self.config_path.as_deref(), &self.cwd).map_err(|e| {
            if matches!(e, ConfigError::NotFound(_)) {
                info!("Run 'hive generate' to create a new config file");
            }
            anyhow::Error::from(e)
        })
    }

    /// Discover, parse, and optionally validate the session config.
    fn load(&self, validate: bool) -> Result<(PathBuf, SessionSpec)> {
        let path = self.discover()?;
        info!("Loading config from {}", path.display());
        let spec = models::parse_file(&path)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if validate {
            spec.validate()
                .map_err(ConfigError::from)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
        }
        Ok((path, spec))
    }

    fn launch(&mut self) -> Result<()> {
        let (_, spec) = self.load(true)?;
        let name = spec.name().to_string();
        info!("Launching session '{}'", name);

        match tmux::launch(self.mux.as_ref(), &spec, &self.cwd) {
            Ok(report) => {
                info!(
                    "✓ Session '{}' launched with {} windows",
                    name,
                    report.windows.len()
                );
                info!("Attach to the session with: tmux attach -t {}", name);
                Ok(())
            }
            Err(TmuxError::SessionExists(_)) => {
                info!("Kill it first with: hive clear");
                bail!("session '{}' already exists", name)
            }
            Err(e) => Err(e).context("failed to launch session"),
        }
    }

    fn relaunch(&mut self) -> Result<()> {
        let (_, spec) = self.load(true)?;
        let name = spec.name().to_string();

        let exists = self
            .mux
            .session_exists(&name)
            .context("failed to query tmux")?;
        if exists {
            let title = format!("Kill existing session '{}' and relaunch?", name);
            if !self.confirm(&title)? {
                info!("Cancelled");
                return Ok(());
            }
            tmux::teardown(self.mux.as_ref(), &name)
                .with_context(|| format!("failed to kill session '{}'", name))?;
            info!("✓ Session '{}' killed", name);
        }

        info!("Launching session '{}'", name);
        tmux::launch(self.mux.as_ref(), &spec, &self.cwd).context("failed to launch session")?;
        info!("✓ Session '{}' launched successfully", name);

        let args = vec!["attach".to_string(), "-t".to_string(), format!("={}", name)];
        if let Err(e) = self.runner.run(&self.config.tmux.binary, &args) {
            warn!("Failed to attach to session (session created successfully): {:#}", e);
            info!("Attach manually with: tmux attach -t {}", name);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let (_, spec) = self.load(false)?;
        let name = spec.name().to_string();

        let exists = self
            .mux
            .session_exists(&name)
            .context("failed to query tmux")?;
        if !exists {
            info!("Session '{}' does not exist", name);
            return Ok(());
        }

        if !self.confirm(&format!("Kill session '{}'?", name))? {
            info!("Cancelled");
            return Ok(());
        }
        tmux::teardown(self.mux.as_ref(), &name)
            .with_context(|| format!("failed to kill session '{}'", name))?;
        info!("✓ Session '{}' killed", name);
        Ok(())
    }

    fn validate(&self, json: bool, out: &mut dyn Write) -> Result<()> {
        if !json {
            let (path, _) = self.load(true)?;
            info!("✓ Configuration {} is valid", path.display());
            return Ok(());
        }

        let (path, spec) = self.load(false)?;
        let errors = models::validate(&spec);
        let report = ValidationReport {
            path: &path,
            valid: errors.is_empty(),
            errors: &errors,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        if !errors.is_empty() {
            bail!("{} has {} validation errors", path.display(), errors.len());
        }
        Ok(())
    }

    fn generate(
        &mut self,
        template: Option<&str>,
        output: Option<&Path>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let name = match template {
            Some(name) => name.to_string(),
            None => {
                let names = self.templates.list().context("failed to list templates")?;
                if names.is_empty() {
                    bail!("no templates available");
                }
                self.prompter
                    .select("Select a template", &names)
                    .map_err(cancelled("template selection"))?
            }
        };

        let spec = self
            .templates
            .read(&name)
            .with_context(|| format!("failed to read template '{}'", name))?;
        self.emit(&spec, output, out)?;
        if let Some(path) = output {
            info!("Generated config written to {}", path.display());
        }
        Ok(())
    }

    fn export(&self, output: Option<&Path>, out: &mut dyn Write) -> Result<()> {
        let spec = match tmux::export(self.mux.as_ref()) {
            Ok(spec) => spec,
            Err(TmuxError::NotAttached) => {
                info!("Run this command from within a tmux session");
                bail!("not in a tmux session");
            }
            Err(e) => return Err(e).context("failed to export session"),
        };
        self.emit(&spec, output, out)?;
        if let Some(path) = output {
            info!("✓ Exported config written to {}", path.display());
        }
        Ok(())
    }

    fn edit_config(&self) -> Result<()> {
        let path = self.discover()?;
        let editor = self.config.editor_command(std::env::var("EDITOR").ok());
        let Some((program, mut args)) = runner::split_command(&editor) else {
            bail!("no editor configured");
        };
        args.push(path.to_string_lossy().into_owned());

        info!("Opening {} in {}", path.display(), editor);
        self.runner
            .run(&program, &args)
            .context("failed to run editor")?;

        info!("Validating configuration...");
        let (path, _) = self.load(true)?;
        info!("✓ Configuration {} is valid", path.display());
        Ok(())
    }

    fn template(&mut self, action: TemplateAction, out: &mut dyn Write) -> Result<()> {
        match action {
            TemplateAction::List => {
                for name in self.templates.list().context("failed to list templates")? {
                    if builtin::is_builtin(&name) {
                        writeln!(out, "{} (built-in)", name)?;
                    } else {
                        writeln!(out, "{}", name)?;
                    }
                }
            }
            TemplateAction::Save { name } => {
                let (_, spec) = self.load(true)?;
                let path = self
                    .templates
                    .save(&name, &spec)
                    .with_context(|| format!("failed to save template '{}'", name))?;
                info!("✓ Template '{}' saved to {}", name, path.display());
            }
            TemplateAction::Delete { name } => {
                self.templates
                    .delete(&name)
                    .with_context(|| format!("failed to delete template '{}'", name))?;
                info!("✓ Template '{}' deleted", name);
            }
        }
        Ok(())
    }

    fn confirm(&mut self, title: &str) -> Result<bool> {
        self.prompter
            .confirm(title, KILL_WARNING)
            .map_err(cancelled("confirmation"))
    }

    fn emit(&self, spec: &SessionSpec, output: Option<&Path>, out: &mut dyn Write) -> Result<()> {
        match output {
            Some(path) => {
                let path = self.cwd.join(path);
                models::write_file(spec, &path)?;
            }
            None => {
                out.write_all(models::to_yaml(spec)?.as_bytes())?;
            }
        }
        Ok(())
    }
}

fn cancelled(what: &'static str) -> impl Fn(PromptError) -> anyhow::Error {
    move |e| match e {
        PromptError::Cancelled => anyhow::anyhow!("{} cancelled", what),
        other => anyhow::Error::new(other).context(format!("{} failed", what)),
    }
}

fn version(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "hive version {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        out,
        "OS/Arch: {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )?;
    Ok(())
}
