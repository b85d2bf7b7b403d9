//! Tasks run by the installer at fixed phases.
//!
//! Configuration tasks run at the start of installation, installation tasks
//! at its end. A failing installation task aborts the phase.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::paths::REMOVABLE_PACKAGES_FILE_PATH;

/// A unit of work run at a defined installation phase
pub trait Task: Send {
    /// Human readable task name
    fn name(&self) -> &str;

    /// Perform the work
    fn run(&self) -> Result<()>;
}

/// Runs before the installation starts. The add-on has nothing to configure.
#[derive(Debug, Default)]
pub struct ConfigurationTask;

impl Task for ConfigurationTask {
    fn name(&self) -> &str {
        "Configure PackageRemove"
    }

    fn run(&self) -> Result<()> {
        info!("Running configuration task.");
        Ok(())
    }
}

/// Writes the chosen packages into the installed system
#[derive(Debug, Clone)]
pub struct InstallationTask {
    sysroot: PathBuf,
    pkgs: Vec<String>,
}

impl InstallationTask {
    pub fn new(sysroot: impl Into<PathBuf>, pkgs: Vec<String>) -> Self {
        Self {
            sysroot: sysroot.into(),
            pkgs,
        }
    }

    /// Where the selection ends up
    pub fn target_path(&self) -> PathBuf {
        normalize(&self.sysroot.join(REMOVABLE_PACKAGES_FILE_PATH))
    }
}

impl Task for InstallationTask {
    fn name(&self) -> &str {
        "Install RemovablePackages"
    }

    fn run(&self) -> Result<()> {
        info!("Running installation task.");
        let path = self.target_path();
        debug!("Writing removable pkgs to: {}", path.display());

        let file = File::create(&path).map_err(|e| Error::write(&path, e))?;
        let mut writer = BufWriter::new(file);
        for pkg in &self.pkgs {
            writeln!(writer, "{}", pkg).map_err(|e| Error::write(&path, e))?;
        }
        writer.flush().map_err(|e| Error::write(&path, e))?;

        Ok(())
    }
}

/// Run tasks in order, stopping at the first failure
pub fn run_tasks(tasks: &[Box<dyn Task>]) -> Result<()> {
    for task in tasks {
        debug!("Starting task: {}", task.name());
        task.run()?;
    }
    Ok(())
}

/// Lexically normalize a path: drop `.` and resolve `..` against earlier parts
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
