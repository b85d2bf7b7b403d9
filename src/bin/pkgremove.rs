use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use pkgremove::candidates::read_candidates;
use pkgremove::cli::{init_logging, CliArgs};
use pkgremove::ipc::{self, Client};
use pkgremove::kickstart::{self, KickstartSource};
use pkgremove::paths::{OBJECT_PATH, SERVICE_NAME};
use pkgremove::service::{run_tasks, PackageRemove, SharedService};
use pkgremove::{AddonConfig, PackageRemoveProxy};

fn main() -> Result<()> {
    init_logging();

    let args = CliArgs::parse(env::args().skip(1))?;
    let Some(command) = args.positional.first().cloned() else {
        print_usage();
        return Ok(());
    };
    if args.help {
        print_usage();
        return Ok(());
    }

    let config = args.config()?;
    let rest = &args.positional[1..];

    match command.as_str() {
        "serve" => serve(&config),
        "lines" => {
            let mut client = Client::connect(&config.socket_path)?;
            print_names(&client.lines()?);
            Ok(())
        }
        "selection" => {
            let mut client = Client::connect(&config.socket_path)?;
            print_names(&client.selection()?);
            Ok(())
        }
        "set" => {
            let mut client = Client::connect(&config.socket_path)?;
            client.set_lines(rest.to_vec())?;
            Ok(())
        }
        "configure" => {
            let mut client = Client::connect(&config.socket_path)?;
            client.configure()?;
            Ok(())
        }
        "install" => install(&args, &config, rest.first().map(PathBuf::from)),
        "kickstart" => dump_kickstart(&config, rest.first().map(Path::new)),
        "candidates" => {
            let path = rest
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| config.candidates_path.clone());
            print_names(&read_candidates(&path)?);
            Ok(())
        }
        "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"pkgremove - choose packages to remove from the installed system

Usage:
    pkgremove serve [--kickstart SRC]   Run the service on its socket
    pkgremove lines                     Print the candidate packages
    pkgremove selection                 Print the packages chosen for removal
    pkgremove set NAME...               Replace the selection
    pkgremove configure                 Run the configuration tasks
    pkgremove install [SYSROOT]         Write the selection into SYSROOT
    pkgremove kickstart [OUT]           Print or save the add-on kickstart data
    pkgremove candidates [FILE]         Parse a candidate file locally
    pkgremove help                      Show this help message

Options:
    --config FILE       Configuration file (TOML, YAML or JSON)
    --socket PATH       Service socket
    --candidates FILE   Candidate package list
    --sysroot PATH      Root of the system under installation
    --kickstart SRC     Kickstart document (file, URL or - for stdin)
    --local             install: run without a service, from --kickstart data

Examples:
    pkgremove serve --kickstart /run/install/ks.yaml
    pkgremove set vim nano
    pkgremove install /mnt/sysimage
"#
    );
}

fn print_names(names: &[String]) {
    for name in names {
        println!("{}", name);
    }
}

fn load_service(config: &AddonConfig) -> Result<PackageRemove> {
    let mut service = PackageRemove::new(config);
    if let Some(arg) = &config.kickstart {
        let source = KickstartSource::from_arg(arg);
        let document = kickstart::load(&source)
            .with_context(|| format!("Failed to load kickstart data from {}", arg))?;
        service.process_kickstart(&document);
    }
    Ok(service)
}

fn serve(config: &AddonConfig) -> Result<()> {
    let mut service = load_service(config)?;
    service
        .remove_pkgs_changed
        .connect(|| tracing::info!("Selection of packages to remove changed"));
    let service = SharedService::new(service);
    tracing::info!("Publishing {} at {}", SERVICE_NAME, OBJECT_PATH);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let socket = config.socket_path.clone();
    let sysroot = config.sysroot.clone();

    let result = runtime.block_on(async {
        let listener = ipc::bind(&socket)?;
        ipc::serve_until(listener, service, sysroot, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    });

    if socket.exists() {
        let _ = std::fs::remove_file(&socket);
    }

    result.context("Service failed")
}

fn install(args: &CliArgs, config: &AddonConfig, sysroot: Option<PathBuf>) -> Result<()> {
    if !args.local {
        let mut client = Client::connect(&config.socket_path)?;
        client.install(sysroot)?;
        return Ok(());
    }

    if config.kickstart.is_none() {
        bail!("pkgremove install --local requires --kickstart");
    }
    if sysroot.is_none() && !nix::unistd::Uid::effective().is_root() {
        bail!(
            "Writing into {} requires root (or pass an explicit SYSROOT)",
            config.sysroot.display()
        );
    }

    let service = load_service(config)?;
    let root = sysroot.unwrap_or_else(|| config.sysroot.clone());
    run_tasks(&service.configure_with_tasks())?;
    run_tasks(&service.install_with_tasks(&root))?;
    println!("✓ Wrote {} packages to remove", service.selection().len());
    Ok(())
}

fn dump_kickstart(config: &AddonConfig, out: Option<&Path>) -> Result<()> {
    let mut client = Client::connect(&config.socket_path)?;
    let document = client.kickstart()?;

    match out {
        Some(path) => kickstart::save(&document, path)?,
        None => print!("{}", serde_yaml::to_string(&document)?),
    }
    Ok(())
}
