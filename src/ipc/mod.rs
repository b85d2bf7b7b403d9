//! Line-delimited JSON protocol between the service and its spokes.
//!
//! Each request is one JSON object on one line; the service answers every
//! request with exactly one response line.

mod client;
mod server;

pub use client::Client;
pub use server::{bind, serve, serve_until};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::kickstart::KickstartDocument;
use crate::service::{run_tasks, SharedService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    /// Candidate list, re-read from disk
    Lines,
    /// Replace the selection
    SetLines { names: Vec<String> },
    /// Current selection
    Selection,
    /// Run the configuration tasks
    Configure,
    /// Run the installation tasks against `sysroot` (service default if absent)
    Install {
        #[serde(default)]
        sysroot: Option<PathBuf>,
    },
    /// Kickstart data generated from the service state
    Kickstart,
    /// Load the add-on state from kickstart data
    ProcessKickstart { document: KickstartDocument },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Lines { names: Vec<String> },
    Kickstart { document: KickstartDocument },
    Done,
    Error { message: String },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Execute one request against the service.
///
/// Task failures are reported back as [`Response::Error`].
pub fn dispatch(service: &SharedService, sysroot: &Path, request: Request) -> Response {
    let mut guard = match service.lock() {
        Ok(guard) => guard,
        Err(e) => return Response::error(e.to_string()),
    };

    match request {
        Request::Lines => Response::Lines {
            names: guard.lines(),
        },
        Request::SetLines { names } => {
            guard.set_selection(names);
            Response::Done
        }
        Request::Selection => Response::Lines {
            names: guard.selection().to_vec(),
        },
        Request::Configure => {
            let tasks = guard.configure_with_tasks();
            drop(guard);
            task_response(run_tasks(&tasks))
        }
        Request::Install { sysroot: requested } => {
            let root = requested.as_deref().unwrap_or(sysroot);
            info!("Installation tasks requested for {}", root.display());
            let tasks = guard.install_with_tasks(root);
            drop(guard);
            task_response(run_tasks(&tasks))
        }
        Request::Kickstart => Response::Kickstart {
            document: guard.generate_kickstart(),
        },
        Request::ProcessKickstart { document } => {
            guard.process_kickstart(&document);
            Response::Done
        }
    }
}

fn task_response(result: crate::Result<()>) -> Response {
    match result {
        Ok(()) => Response::Done,
        Err(e) => {
            error!("Task failed: {}", e);
            Response::error(e.to_string())
        }
    }
}
