use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::kickstart::Format;
use crate::paths::{DEFAULT_SOCKET_PATH, DEFAULT_SYSROOT, PACKAGES_LIST_FILE_PATH};

/// Runtime configuration of the add-on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonConfig {
    /// File listing the removable package candidates
    #[serde(default = "default_candidates_path")]
    pub candidates_path: PathBuf,

    /// Root of the system under installation
    #[serde(default = "default_sysroot")]
    pub sysroot: PathBuf,

    /// Socket the service listens on and the spokes connect to
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Kickstart document processed when the service starts
    #[serde(default)]
    pub kickstart: Option<String>,
}

fn default_candidates_path() -> PathBuf {
    PathBuf::from(PACKAGES_LIST_FILE_PATH)
}

fn default_sysroot() -> PathBuf {
    PathBuf::from(DEFAULT_SYSROOT)
}

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            candidates_path: default_candidates_path(),
            sysroot: default_sysroot(),
            socket_path: default_socket_path(),
            kickstart: None,
        }
    }
}

impl AddonConfig {
    /// Load configuration from a TOML, YAML or JSON file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let format = Format::from_path(path).unwrap_or(Format::Toml);
        format.parse(&content)
    }

    /// Load from an optional path, falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
