//! The package removal service.
//!
//! Holds the candidate list and the user's selection for the lifetime of the
//! service, exchanges both with kickstart data and hands out the tasks the
//! installer runs.

mod signal;
pub mod tasks;

pub use signal::Signal;
pub use tasks::{run_tasks, ConfigurationTask, InstallationTask, Task};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error};

use crate::candidates::read_candidates;
use crate::config::AddonConfig;
use crate::error::{Error, Result};
use crate::kickstart::KickstartDocument;

#[derive(Debug)]
pub struct PackageRemove {
    candidates_path: PathBuf,
    list: Vec<String>,
    remove: Vec<String>,
    /// Emitted whenever the selection is replaced
    pub remove_pkgs_changed: Signal,
}

impl PackageRemove {
    pub fn new(config: &AddonConfig) -> Self {
        Self::with_candidates_path(&config.candidates_path)
    }

    pub fn with_candidates_path(path: impl Into<PathBuf>) -> Self {
        Self {
            candidates_path: path.into(),
            list: Vec::new(),
            remove: Vec::new(),
            remove_pkgs_changed: Signal::new(),
        }
    }

    /// Candidate packages, re-read from disk on every call.
    ///
    /// A read failure is logged and the previously known list is returned.
    pub fn lines(&mut self) -> Vec<String> {
        match read_candidates(&self.candidates_path) {
            Ok(pkgs) => {
                self.list = pkgs;
                debug!(
                    "Packages list from {} loaded ({} entries)",
                    self.candidates_path.display(),
                    self.list.len()
                );
            }
            Err(e) => error!("Unable to process removable packages file: {}", e),
        }
        self.list.clone()
    }

    /// Last candidate list, without touching the disk
    pub fn list(&self) -> &[String] {
        &self.list
    }

    /// Packages chosen for removal
    pub fn selection(&self) -> &[String] {
        &self.remove
    }

    /// Replace the selection and notify observers
    pub fn set_selection(&mut self, pkgs: Vec<String>) {
        debug!("Selection replaced: {:?}", pkgs);
        self.remove = pkgs;
        self.remove_pkgs_changed.emit();
    }

    /// Take the add-on section of kickstart data
    pub fn process_kickstart(&mut self, data: &KickstartDocument) {
        debug!("Processing kickstart data...");
        let section = data.package_remove();
        self.list = section.list.clone();
        self.remove = section.remove.clone();
    }

    /// Store the add-on state into kickstart data
    pub fn setup_kickstart(&self, data: &mut KickstartDocument) {
        debug!("Generating kickstart data...");
        let section = data.package_remove_mut();
        section.list = self.list.clone();
        section.remove = self.remove.clone();
    }

    pub fn generate_kickstart(&self) -> KickstartDocument {
        let mut data = KickstartDocument::default();
        self.setup_kickstart(&mut data);
        data
    }

    /// Tasks run at the beginning of the installation
    pub fn configure_with_tasks(&self) -> Vec<Box<dyn Task>> {
        vec![Box::new(ConfigurationTask)]
    }

    /// Tasks run at the end of the installation
    pub fn install_with_tasks(&self, sysroot: &Path) -> Vec<Box<dyn Task>> {
        vec![Box::new(InstallationTask::new(sysroot, self.remove.clone()))]
    }
}

/// A service shared between the socket server and in-process spokes
#[derive(Debug, Clone)]
pub struct SharedService(Arc<Mutex<PackageRemove>>);

impl SharedService {
    pub fn new(service: PackageRemove) -> Self {
        Self(Arc::new(Mutex::new(service)))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, PackageRemove>> {
        self.0
            .lock()
            .map_err(|_| Error::State("package remove service lock poisoned".into()))
    }
}
