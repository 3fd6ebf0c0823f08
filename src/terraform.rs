use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{Context, Result, bail};

/// A name is usable when it has something besides hyphens and neither
/// starts nor ends with one.
pub fn is_valid_hyphenated_name(name: &str) -> bool {
    !name.replace('-', "").is_empty() && !name.starts_with('-') && !name.ends_with('-')
}

/// Arguments for a single `terraform plan` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub vars: Vec<(String, String)>,
    pub targets: Vec<String>,
    pub no_color: bool,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            vars: Vec::new(),
            targets: Vec::new(),
            no_color: true,
        }
    }
}

impl PlanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((name.into(), value.into()));
        self
    }

    pub fn target(mut self, address: impl Into<String>) -> Self {
        self.targets.push(address.into());
        self
    }

    pub fn no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Command-line arguments following `plan`, excluding the directory.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.vars.len() * 2 + self.targets.len() + 1);
        for (name, value) in &self.vars {
            args.push("-var".to_string());
            args.push(format!("{name}={value}"));
        }
        for target in &self.targets {
            args.push(format!("-target={target}"));
        }
        if self.no_color {
            args.push("-no-color".to_string());
        }
        args
    }
}

/// Parses `NAME=VALUE` as given to `--var`.
pub fn parse_var(s: &str) -> Result<(String, String)> {
    let Some((name, value)) = s.split_once('=') else {
        bail!("Invalid variable '{s}': expected NAME=VALUE");
    };
    if name.is_empty() {
        bail!("Invalid variable '{s}': empty name");
    }
    Ok((name.to_string(), value.to_string()))
}

/// Runs the `terraform` CLI against one configuration directory.
#[derive(Debug, Clone)]
pub struct Terraform {
    binary: PathBuf,
    dir: PathBuf,
}

impl Terraform {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("terraform"),
            dir: dir.into(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn init(&self) -> Result<()> {
        self.run("init", Vec::new()).map(|_| ())
    }

    /// Downloads the modules referenced by the configuration.
    pub fn get(&self) -> Result<()> {
        self.run("get", Vec::new()).map(|_| ())
    }

    /// Returns the plan's standard output.
    pub fn plan(&self, request: &PlanRequest) -> Result<String> {
        for (name, value) in &request.vars {
            if name == "name" && !is_valid_hyphenated_name(value) {
                tracing::warn!(%value, "name variable has leading, trailing or only hyphens");
            }
        }

        let args = request.args().into_iter().map(OsString::from).collect();
        let output = self.run("plan", args)?;
        String::from_utf8(output.stdout).context("terraform plan output is not valid UTF-8")
    }

    fn run(&self, subcommand: &str, args: Vec<OsString>) -> Result<Output> {
        let mut command = Command::new(&self.binary);
        command.arg(subcommand).args(args).arg(&self.dir);
        tracing::info!(?command, "running terraform");

        let output = command
            .output()
            .with_context(|| format!("Failed to execute {}", self.binary.display()))?;

        if !output.status.success() {
            bail!(
                "terraform {subcommand} failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output)
    }
}
