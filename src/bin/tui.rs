use anyhow::Result;
use std::env;

use pkgremove::cli::{init_logging, CliArgs};
use pkgremove::spoke::SpokeModel;
use pkgremove::tui;

fn main() -> Result<()> {
    init_logging();

    let args = CliArgs::parse(env::args().skip(1))?;
    if args.help {
        println!("Usage: pkgremove-tui [--socket PATH | --local] [--candidates FILE] [--config FILE]");
        return Ok(());
    }

    let config = args.config()?;
    if !SpokeModel::showable(&config.candidates_path) {
        println!(
            "No removable package list at {}, nothing to choose.",
            config.candidates_path.display()
        );
        return Ok(());
    }

    let mut proxy = args.proxy(&config)?;
    let selection = tui::run(proxy.as_mut())?;

    println!("Packages to remove: {}", selection.len());
    for name in &selection {
        println!("  {}", name);
    }
    Ok(())
}
