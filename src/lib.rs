//! Package removal add-on for the installer.
//!
//! The add-on reads a list of removable packages, lets the user pick some of
//! them through one of two spokes, and writes the picked names into the
//! installed system at the end of installation.

pub mod candidates;
pub mod cli;
pub mod config;
pub mod error;
pub mod ipc;
pub mod kickstart;
pub mod paths;
pub mod proxy;
pub mod service;
pub mod spoke;
pub mod text;
pub mod tui;

pub use config::AddonConfig;
pub use error::{Error, Result};
pub use kickstart::{KickstartDocument, KickstartSource, PackageRemoveData};
pub use proxy::PackageRemoveProxy;
pub use service::{PackageRemove, SharedService};
pub use spoke::SpokeModel;
