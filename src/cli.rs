//! Command line handling shared by the binaries.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::config::AddonConfig;
use crate::ipc::Client;
use crate::proxy::PackageRemoveProxy;
use crate::service::PackageRemove;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Arguments that are not options, in order
    pub positional: Vec<String>,
    pub config: Option<PathBuf>,
    pub socket: Option<PathBuf>,
    pub candidates: Option<PathBuf>,
    pub sysroot: Option<PathBuf>,
    pub kickstart: Option<String>,
    pub columns: Option<usize>,
    /// Run against an in-process service instead of the socket
    pub local: bool,
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(value(&arg, args.next())?.into()),
                "--socket" => parsed.socket = Some(value(&arg, args.next())?.into()),
                "--candidates" => parsed.candidates = Some(value(&arg, args.next())?.into()),
                "--sysroot" => parsed.sysroot = Some(value(&arg, args.next())?.into()),
                "--kickstart" => parsed.kickstart = Some(value(&arg, args.next())?),
                "--columns" => {
                    let raw = value(&arg, args.next())?;
                    let columns = raw
                        .parse::<usize>()
                        .with_context(|| format!("Invalid column count: {}", raw))?;
                    parsed.columns = Some(columns);
                }
                "--local" => parsed.local = true,
                "--help" | "-h" => parsed.help = true,
                other if other.starts_with("--") => bail!("Unknown option: {}", other),
                positional => parsed.positional.push(positional.to_string()),
            }
        }

        Ok(parsed)
    }

    /// Configuration file values with command line overrides applied
    pub fn config(&self) -> Result<AddonConfig> {
        let mut config = AddonConfig::load_or_default(self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(socket) = &self.socket {
            config.socket_path = socket.clone();
        }
        if let Some(candidates) = &self.candidates {
            config.candidates_path = candidates.clone();
        }
        if let Some(sysroot) = &self.sysroot {
            config.sysroot = sysroot.clone();
        }
        if let Some(kickstart) = &self.kickstart {
            config.kickstart = Some(kickstart.clone());
        }

        Ok(config)
    }

    /// Service accessor for the spokes: in process with `--local`, else the socket
    pub fn proxy(&self, config: &AddonConfig) -> Result<Box<dyn PackageRemoveProxy>> {
        if self.local {
            Ok(Box::new(PackageRemove::new(config)))
        } else {
            let client = Client::connect(&config.socket_path)?;
            Ok(Box::new(client))
        }
    }
}

fn value(flag: &str, next: Option<String>) -> Result<String> {
    match next {
        Some(v) => Ok(v),
        None => bail!("{} requires a value", flag),
    }
}

/// Install the tracing subscriber. Output goes to stderr.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn options_and_positionals() {
        let parsed = CliArgs::parse(args(&[
            "set",
            "--socket",
            "/tmp/s.sock",
            "vim",
            "--local",
            "nano",
        ]))
        .unwrap();
        assert_eq!(parsed.positional, vec!["set", "vim", "nano"]);
        assert_eq!(parsed.socket, Some(PathBuf::from("/tmp/s.sock")));
        assert!(parsed.local);
    }

    #[test]
    fn missing_value_is_an_error() {
        assert!(CliArgs::parse(args(&["--config"])).is_err());
    }

    #[test]
    fn unknown_option_is_an_error() {
        assert!(CliArgs::parse(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn bad_column_count() {
        assert!(CliArgs::parse(args(&["--columns", "three"])).is_err());
        let parsed = CliArgs::parse(args(&["--columns", "2"])).unwrap();
        assert_eq!(parsed.columns, Some(2));
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let parsed = CliArgs::parse(args(&[
            "--sysroot",
            "/mnt/target",
            "--candidates",
            "/tmp/pkgs.list",
            "--kickstart",
            "ks.yaml",
        ]))
        .unwrap();
        let config = parsed.config().unwrap();
        assert_eq!(config.sysroot, PathBuf::from("/mnt/target"));
        assert_eq!(config.candidates_path, PathBuf::from("/tmp/pkgs.list"));
        assert_eq!(config.kickstart.as_deref(), Some("ks.yaml"));
        assert_eq!(config.socket_path, AddonConfig::default().socket_path);
    }

    #[test]
    fn local_proxy_reads_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkgs.list");
        std::fs::write(&path, "vim\n").unwrap();

        let parsed = CliArgs::parse(args(&["--local"])).unwrap();
        let config = AddonConfig {
            candidates_path: path,
            ..AddonConfig::default()
        };
        let mut proxy = parsed.proxy(&config).unwrap();
        assert_eq!(proxy.lines().unwrap(), vec!["vim"]);
    }
}
